//! Pre-fitted TF-IDF vectorizer and sparse feature rows.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Tokens are runs of two or more word characters.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Row normalization applied after IDF weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// One sparse feature row: `(column, value)` pairs sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    /// Non-zero entries, sorted by column.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense weight vector. Columns past the end of
    /// `weights` contribute nothing.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(col, value)| weights.get(col).map(|w| w * value))
            .sum()
    }
}

/// A batch of sparse rows sharing one column space.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    n_features: usize,
    rows: Vec<SparseRow>,
}

impl FeatureMatrix {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

/// TF-IDF vectorizer with a vocabulary and IDF weights fitted elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term -> column index.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    pub idf: Vec<f64>,
    #[serde(default)]
    pub norm: Norm,
    /// Use `1 + ln(tf)` instead of raw counts.
    #[serde(default)]
    pub sublinear_tf: bool,
}

impl TfidfVectorizer {
    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Check the fitted state is internally consistent.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(ModelError::ShapeMismatch {
                field: "vectorizer.idf".into(),
                expected: self.vocabulary.len(),
                actual: self.idf.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.vocabulary.len());
        for (term, &index) in &self.vocabulary {
            if index >= self.idf.len() {
                return Err(ModelError::InvalidVectorizer(format!(
                    "term {term:?} maps to column {index}, but there are only {} columns",
                    self.idf.len()
                )));
            }
            if !seen.insert(index) {
                return Err(ModelError::InvalidVectorizer(format!(
                    "column {index} is assigned to more than one term"
                )));
            }
        }

        if self.idf.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite {
                field: "vectorizer.idf".into(),
            });
        }

        Ok(())
    }

    /// Turn each document into one TF-IDF weighted row.
    pub fn transform(&self, documents: &[String]) -> FeatureMatrix {
        let rows = documents.iter().map(|doc| self.transform_one(doc)).collect();
        FeatureMatrix {
            n_features: self.n_features(),
            rows,
        }
    }

    fn transform_one(&self, document: &str) -> SparseRow {
        let lowered = document.to_lowercase();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in TOKEN_PATTERN.find_iter(&lowered) {
            if let Some(&col) = self.vocabulary.get(token.as_str()) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (col, tf * self.idf[col])
            })
            .collect();

        let scale = match self.norm {
            Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if scale > 0.0 && scale != 1.0 {
            for (_, v) in &mut entries {
                *v /= scale;
            }
        }

        SparseRow { entries }
    }
}
