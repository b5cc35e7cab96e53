//! Porter stemmer (1980 algorithm with the NLTK extensions).
//!
//! Stems match NLTK's `PorterStemmer()` default mode, so vocabularies
//! fitted with it line up with ours.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Words stemmed by lookup instead of by rule.
static IRREGULAR_FORMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("sky", "sky"),
        ("skies", "sky"),
        ("dying", "die"),
        ("lying", "lie"),
        ("tying", "tie"),
        ("news", "news"),
        ("innings", "inning"),
        ("inning", "inning"),
        ("outings", "outing"),
        ("outing", "outing"),
        ("cannings", "canning"),
        ("canning", "canning"),
        ("howe", "howe"),
        ("proceed", "proceed"),
        ("exceed", "exceed"),
        ("succeed", "succeed"),
    ]
    .into_iter()
    .collect()
});

type Condition = fn(&[char]) -> bool;

/// Suffix, replacement, and the condition the remaining stem must meet.
type Rule = (&'static str, &'static str, Condition);

const STEP2_RULES: &[Rule] = &[
    ("ational", "ate", positive_measure),
    ("tional", "tion", positive_measure),
    ("enci", "ence", positive_measure),
    ("anci", "ance", positive_measure),
    ("izer", "ize", positive_measure),
    ("bli", "ble", positive_measure),
    ("alli", "al", positive_measure),
    ("entli", "ent", positive_measure),
    ("eli", "e", positive_measure),
    ("ousli", "ous", positive_measure),
    ("ization", "ize", positive_measure),
    ("ation", "ate", positive_measure),
    ("ator", "ate", positive_measure),
    ("alism", "al", positive_measure),
    ("iveness", "ive", positive_measure),
    ("fulness", "ful", positive_measure),
    ("ousness", "ous", positive_measure),
    ("aliti", "al", positive_measure),
    ("iviti", "ive", positive_measure),
    ("biliti", "ble", positive_measure),
    ("fulli", "ful", positive_measure),
    ("logi", "log", logi_condition),
];

const STEP3_RULES: &[Rule] = &[
    ("icate", "ic", positive_measure),
    ("ative", "", positive_measure),
    ("alize", "al", positive_measure),
    ("iciti", "ic", positive_measure),
    ("ical", "ic", positive_measure),
    ("ful", "", positive_measure),
    ("ness", "", positive_measure),
];

const STEP4_RULES: &[Rule] = &[
    ("al", "", measure_above_one),
    ("ance", "", measure_above_one),
    ("ence", "", measure_above_one),
    ("er", "", measure_above_one),
    ("ic", "", measure_above_one),
    ("able", "", measure_above_one),
    ("ible", "", measure_above_one),
    ("ant", "", measure_above_one),
    ("ement", "", measure_above_one),
    ("ment", "", measure_above_one),
    ("ent", "", measure_above_one),
    ("ion", "", ion_condition),
    ("ou", "", measure_above_one),
    ("ism", "", measure_above_one),
    ("ate", "", measure_above_one),
    ("iti", "", measure_above_one),
    ("ous", "", measure_above_one),
    ("ive", "", measure_above_one),
    ("ize", "", measure_above_one),
];

/// Rule-based English stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    /// Stem one word. The word is lowercased first.
    pub fn stem(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        if let Some(stem) = IRREGULAR_FORMS.get(lowered.as_str()) {
            return (*stem).to_string();
        }

        let chars: Vec<char> = lowered.chars().collect();
        if chars.len() <= 2 {
            return lowered;
        }

        let w = step1a(chars);
        let w = step1b(w);
        let w = step1c(w);
        let w = step2(w);
        let w = apply_rules(w, STEP3_RULES);
        let w = apply_rules(w, STEP4_RULES);
        let w = step5a(w);
        let w = step5b(w);
        w.into_iter().collect()
    }
}

// ── Word shape helpers ──────────────────────────────────────────────────

fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences, `m` in `[C](VC)^m[V]`.
fn measure(stem: &[char]) -> usize {
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..stem.len() {
        let consonant = is_consonant(stem, i);
        if consonant && prev_vowel {
            m += 1;
        }
        prev_vowel = !consonant;
    }
    m
}

fn positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn measure_above_one(stem: &[char]) -> bool {
    measure(stem) > 1
}

// The `l` stays with the stem so short stems like `geo` still qualify.
fn logi_condition(stem: &[char]) -> bool {
    positive_measure(&with_l(stem))
}

fn ion_condition(stem: &[char]) -> bool {
    measure_above_one(stem) && matches!(stem.last(), Some('s' | 't'))
}

fn contains_vowel(stem: &[char]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// Consonant-vowel-consonant ending where the last consonant is not
/// `w`, `x` or `y`. A two-letter vowel-consonant word also counts.
fn ends_cvc(word: &[char]) -> bool {
    let n = word.len();
    if n >= 3 {
        is_consonant(word, n - 3)
            && !is_consonant(word, n - 2)
            && is_consonant(word, n - 1)
            && !matches!(word[n - 1], 'w' | 'x' | 'y')
    } else {
        n == 2 && !is_consonant(word, 0) && is_consonant(word, 1)
    }
}

fn ends_with(word: &[char], suffix: &str) -> bool {
    let n = suffix.chars().count();
    word.len() >= n && word[word.len() - n..].iter().copied().eq(suffix.chars())
}

fn replace_suffix(mut word: Vec<char>, suffix: &str, replacement: &str) -> Vec<char> {
    word.truncate(word.len() - suffix.chars().count());
    word.extend(replacement.chars());
    word
}

fn with_l(stem: &[char]) -> Vec<char> {
    let mut s = stem.to_vec();
    s.push('l');
    s
}

/// Apply the first rule whose suffix matches. A matching suffix whose
/// condition fails stops the search and leaves the word unchanged.
fn apply_rules(word: Vec<char>, rules: &[Rule]) -> Vec<char> {
    for &(suffix, replacement, condition) in rules {
        if ends_with(&word, suffix) {
            let stem_len = word.len() - suffix.chars().count();
            if condition(&word[..stem_len]) {
                return replace_suffix(word, suffix, replacement);
            }
            return word;
        }
    }
    word
}

// ── Steps ───────────────────────────────────────────────────────────────

fn step1a(word: Vec<char>) -> Vec<char> {
    if word.len() == 4 && ends_with(&word, "ies") {
        return replace_suffix(word, "ies", "ie");
    }
    if ends_with(&word, "sses") {
        replace_suffix(word, "sses", "ss")
    } else if ends_with(&word, "ies") {
        replace_suffix(word, "ies", "i")
    } else if ends_with(&word, "ss") {
        word
    } else if ends_with(&word, "s") {
        replace_suffix(word, "s", "")
    } else {
        word
    }
}

fn step1b(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return replace_suffix(word, "ied", replacement);
    }

    if ends_with(&word, "eed") {
        if positive_measure(&word[..word.len() - 3]) {
            return replace_suffix(word, "eed", "ee");
        }
        return word;
    }

    let suffix = ["ed", "ing"]
        .into_iter()
        .find(|s| ends_with(&word, s) && contains_vowel(&word[..word.len() - s.len()]));
    let Some(suffix) = suffix else {
        return word;
    };

    let mut stem = replace_suffix(word, suffix, "");
    if ends_with(&stem, "at") || ends_with(&stem, "bl") || ends_with(&stem, "iz") {
        stem.push('e');
    } else if ends_double_consonant(&stem) {
        if !matches!(stem.last(), Some('l' | 's' | 'z')) {
            stem.pop();
        }
    } else if measure(&stem) == 1 && ends_cvc(&stem) {
        stem.push('e');
    }
    stem
}

fn step1c(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "y") {
        let stem = &word[..word.len() - 1];
        if stem.len() > 1 && is_consonant(stem, stem.len() - 1) {
            return replace_suffix(word, "y", "i");
        }
    }
    word
}

fn step2(word: Vec<char>) -> Vec<char> {
    // `alli` is rewritten first and the result goes through the step again.
    if ends_with(&word, "alli") && positive_measure(&word[..word.len() - 4]) {
        return step2(replace_suffix(word, "alli", "al"));
    }
    apply_rules(word, STEP2_RULES)
}

fn step5a(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "e") {
        let stem = &word[..word.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return replace_suffix(word, "e", "");
        }
    }
    word
}

fn step5b(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ll") && measure(&word[..word.len() - 1]) > 1 {
        return replace_suffix(word, "ll", "l");
    }
    word
}
