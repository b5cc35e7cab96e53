//! Treebank-style word tokenizer.
//!
//! Splits text into word and punctuation tokens using the Penn Treebank
//! conventions: punctuation becomes its own token, a sentence-final period
//! is split from its word, contractions are split (`don't` -> `do n't`) and
//! commas inside numbers (`10,000`) are left alone.

use std::sync::LazyLock;

use regex::Regex;

/// A compiled rewrite rule: every match of `regex` is replaced by `replacement`.
struct Rule {
    regex: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        regex: Regex::new(pattern).unwrap(),
        replacement,
    }
}

/// Rules applied to the raw (unpadded) text.
static LEADING_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // Starting quotes
        rule(r#"^""#, "``"),
        rule(r"(``)", " ${1} "),
        rule(r#"([ (\[{<])("|'')"#, "${1} `` "),
        // Punctuation
        rule(r"([:,])([^\d])", " ${1} ${2}"),
        rule(r"([:,])$", " ${1} "),
        rule(r"\.\.\.", " ... "),
        rule(r"[;@#$%&]", " ${0} "),
        rule(r"[?!]", " ${0} "),
        rule(r"([^'])' ", "${1} ' "),
        // Brackets
        rule(r"[\]\[(){}<>]", " ${0} "),
        rule(r"--", " -- "),
    ]
});

/// Rules applied after the text is padded with a space on each side.
static TRAILING_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // Ending quotes
        rule(r#"""#, " '' "),
        rule(r"(\S)('')", "${1} ${2} "),
        rule(r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        rule(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
        // Fused contractions
        rule(r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        rule(r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        rule(r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        rule(r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        rule(r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        rule(r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        rule(r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        rule(r"(?i)\b(wan)(na)\s", " ${1} ${2} "),
        rule(r"(?i) ('t)(is)\b", " ${1} ${2} "),
        rule(r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ]
});

/// Characters that may trail a sentence-final period (`end.)`, `end."`).
const PERIOD_CLOSERS: &[char] = &[']', ')', '}', '>', '"', '\''];

/// Word tokenizer following Penn Treebank conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Create a new tokenizer.
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into tokens, preserving order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut text = split_final_periods(text);

        for r in LEADING_RULES.iter() {
            text = r.regex.replace_all(&text, r.replacement).into_owned();
        }

        text = format!(" {text} ");

        for r in TRAILING_RULES.iter() {
            text = r.regex.replace_all(&text, r.replacement).into_owned();
        }

        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Split sentence-final periods off their words.
///
/// A chunk ending in a single period is split (`3pm.` -> `3pm .`) unless the
/// word itself contains a period, which keeps abbreviations such as `e.g.`
/// and `u.s.` whole. Ellipses are left for the `...` rule.
fn split_final_periods(text: &str) -> String {
    text.split_whitespace()
        .map(|chunk| {
            let body = chunk.trim_end_matches(PERIOD_CLOSERS);
            let closers = &chunk[body.len()..];
            match body.strip_suffix('.') {
                Some(word) if !word.is_empty() && !word.contains('.') => {
                    format!("{word} .{closers}")
                }
                _ => chunk.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        WordTokenizer::new().tokenize(text)
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \n\t").is_empty());
    }

    #[test]
    fn punctuation_is_split_off() {
        assert_eq!(tokens("free! win cash now"), vec!["free", "!", "win", "cash", "now"]);
        assert_eq!(
            tokens("hi, are you coming?"),
            vec!["hi", ",", "are", "you", "coming", "?"]
        );
    }

    #[test]
    fn sentence_final_period_is_split() {
        assert_eq!(
            tokens("your meeting is at 3pm."),
            vec!["your", "meeting", "is", "at", "3pm", "."]
        );
        assert_eq!(tokens("one. two."), vec!["one", ".", "two", "."]);
    }

    #[test]
    fn abbreviations_keep_their_periods() {
        assert_eq!(tokens("e.g. this"), vec!["e.g.", "this"]);
    }

    #[test]
    fn ellipsis_is_one_token() {
        assert_eq!(tokens("wait... what"), vec!["wait", "...", "what"]);
    }

    #[test]
    fn contractions_are_split() {
        assert_eq!(tokens("don't stop"), vec!["do", "n't", "stop"]);
        assert_eq!(tokens("you've been selected"), vec!["you", "'ve", "been", "selected"]);
        assert_eq!(tokens("it's here"), vec!["it", "'s", "here"]);
        assert_eq!(tokens("i cannot"), vec!["i", "can", "not"]);
        assert_eq!(tokens("gonna win"), vec!["gon", "na", "win"]);
    }

    #[test]
    fn numbers_keep_inner_commas() {
        assert_eq!(tokens("win 10,000 now"), vec!["win", "10,000", "now"]);
    }

    #[test]
    fn brackets_and_symbols_are_tokens() {
        assert_eq!(
            tokens("call (now) & save 50%"),
            vec!["call", "(", "now", ")", "&", "save", "50", "%"]
        );
    }

    #[test]
    fn period_before_closing_bracket() {
        assert_eq!(tokens("(see here.)"), vec!["(", "see", "here", ".", ")"]);
    }

    #[test]
    fn quotes_become_treebank_quotes() {
        assert_eq!(tokens(r#""hello""#), vec!["``", "hello", "''"]);
    }
}
