//! Pre-fitted binary classifiers.
//!
//! Class 0 is "not spam", class 1 is "spam". Both models are deterministic
//! given their fitted parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::vectorizer::{FeatureMatrix, SparseRow};
use crate::error::ModelError;

/// Number of classes every model must have.
pub const N_CLASSES: usize = 2;

/// Predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    NotSpam,
    Spam,
}

impl Label {
    /// Class index in probability vectors.
    pub fn index(self) -> usize {
        match self {
            Self::NotSpam => 0,
            Self::Spam => 1,
        }
    }

    fn from_index(index: usize) -> Self {
        if index == 1 { Self::Spam } else { Self::NotSpam }
    }

    /// Short label for logs and the flat classification log.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSpam => "not_spam",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted binary classifier over TF-IDF features.
pub trait Classifier: Send + Sync {
    /// Number of feature columns the model was fitted on.
    fn n_features(&self) -> usize;

    /// One `[p(not spam), p(spam)]` vector per row.
    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; N_CLASSES]>, ModelError>;

    /// One predicted label per row.
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Label>, ModelError>;

    /// Reject matrices built for a different column space.
    fn check_features(&self, x: &FeatureMatrix) -> Result<(), ModelError> {
        if x.n_features() != self.n_features() {
            return Err(ModelError::FeatureCount {
                expected: self.n_features(),
                actual: x.n_features(),
            });
        }
        Ok(())
    }
}

// ── Multinomial naive Bayes ─────────────────────────────────────────────

/// Multinomial naive Bayes with fitted log priors and per-class feature
/// log probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    pub class_log_prior: Vec<f64>,
    /// `[class][feature]`.
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    fn check_classes(&self) -> Result<(), ModelError> {
        expect_len("model.class_log_prior", N_CLASSES, self.class_log_prior.len())?;
        expect_len("model.feature_log_prob", N_CLASSES, self.feature_log_prob.len())
    }

    fn joint_log_likelihood(&self, row: &SparseRow) -> [f64; N_CLASSES] {
        let mut jll = [0.0; N_CLASSES];
        for (class, slot) in jll.iter_mut().enumerate() {
            *slot = self.class_log_prior[class] + row.dot(&self.feature_log_prob[class]);
        }
        jll
    }
}

impl Classifier for MultinomialNb {
    fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; N_CLASSES]>, ModelError> {
        self.check_classes()?;
        self.check_features(x)?;
        Ok(x.rows()
            .iter()
            .map(|row| softmax(self.joint_log_likelihood(row)))
            .collect())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Label>, ModelError> {
        self.check_classes()?;
        self.check_features(x)?;
        Ok(x.rows()
            .iter()
            .map(|row| Label::from_index(argmax(&self.joint_log_likelihood(row))))
            .collect())
    }
}

// ── Logistic regression ─────────────────────────────────────────────────

/// Binary logistic regression: `p(spam) = sigmoid(coef . x + intercept)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    fn decision(&self, row: &SparseRow) -> f64 {
        row.dot(&self.coef) + self.intercept
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; N_CLASSES]>, ModelError> {
        self.check_features(x)?;
        Ok(x.rows()
            .iter()
            .map(|row| {
                let p = sigmoid(self.decision(row));
                [1.0 - p, p]
            })
            .collect())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Label>, ModelError> {
        self.check_features(x)?;
        Ok(x.rows()
            .iter()
            .map(|row| {
                if self.decision(row) > 0.0 {
                    Label::Spam
                } else {
                    Label::NotSpam
                }
            })
            .collect())
    }
}

// ── Serialized model ────────────────────────────────────────────────────

/// The model section of a model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    MultinomialNb(MultinomialNb),
    LogisticRegression(LogisticRegression),
}

impl ModelSpec {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MultinomialNb(_) => "multinomial_nb",
            Self::LogisticRegression(_) => "logistic_regression",
        }
    }

    /// Check shapes against the vectorizer's column count and reject
    /// non-finite parameters.
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        match self {
            Self::MultinomialNb(nb) => {
                nb.check_classes()?;
                for (class, row) in nb.feature_log_prob.iter().enumerate() {
                    expect_len(&format!("model.feature_log_prob[{class}]"), n_features, row.len())?;
                }
                expect_finite("model.class_log_prior", &nb.class_log_prior)?;
                for (class, row) in nb.feature_log_prob.iter().enumerate() {
                    expect_finite(&format!("model.feature_log_prob[{class}]"), row)?;
                }
            }
            Self::LogisticRegression(lr) => {
                expect_len("model.coef", n_features, lr.coef.len())?;
                expect_finite("model.coef", &lr.coef)?;
                expect_finite("model.intercept", &[lr.intercept])?;
            }
        }
        Ok(())
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            Self::MultinomialNb(nb) => nb,
            Self::LogisticRegression(lr) => lr,
        }
    }
}

impl Classifier for ModelSpec {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; N_CLASSES]>, ModelError> {
        self.inner().predict_proba(x)
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Label>, ModelError> {
        self.inner().predict(x)
    }
}

fn expect_len(field: &str, expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected != actual {
        return Err(ModelError::ShapeMismatch {
            field: field.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn expect_finite(field: &str, values: &[f64]) -> Result<(), ModelError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

// ── Numerics ────────────────────────────────────────────────────────────

/// First index of the largest value (ties go to the lower class).
fn argmax(values: &[f64; N_CLASSES]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Log-sum-exp softmax.
fn softmax(jll: [f64; N_CLASSES]) -> [f64; N_CLASSES] {
    let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = jll.iter().map(|v| (v - max).exp()).sum();
    let log_norm = max + sum.ln();
    jll.map(|v| (v - log_norm).exp())
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vectorizer::{Norm, TfidfVectorizer};

    fn vectorizer() -> TfidfVectorizer {
        TfidfVectorizer {
            vocabulary: [("free", 0), ("cash", 1), ("meet", 2)]
                .into_iter()
                .map(|(t, i)| (t.to_string(), i))
                .collect(),
            idf: vec![1.0, 1.0, 1.0],
            norm: Norm::L2,
            sublinear_tf: false,
        }
    }

    fn nb() -> MultinomialNb {
        MultinomialNb {
            class_log_prior: vec![(0.8f64).ln(), (0.2f64).ln()],
            feature_log_prob: vec![
                vec![-6.0, -6.0, -1.0],
                vec![-1.0, -1.0, -6.0],
            ],
        }
    }

    fn lr() -> LogisticRegression {
        LogisticRegression {
            coef: vec![3.0, 3.0, -3.0],
            intercept: -1.0,
        }
    }

    fn features(docs: &[&str]) -> FeatureMatrix {
        let docs: Vec<String> = docs.iter().map(|d| d.to_string()).collect();
        vectorizer().transform(&docs)
    }

    #[test]
    fn nb_predicts_spam_for_spam_terms() {
        let x = features(&["free cash", "meet"]);
        assert_eq!(nb().predict(&x).unwrap(), vec![Label::Spam, Label::NotSpam]);
    }

    #[test]
    fn nb_probabilities_sum_to_one() {
        let x = features(&["free cash", "meet", "", "free meet"]);
        for p in nb().predict_proba(&x).unwrap() {
            assert!((p[0] + p[1] - 1.0).abs() < 1e-12);
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn nb_empty_row_falls_back_to_prior() {
        let x = features(&[""]);
        let p = nb().predict_proba(&x).unwrap()[0];
        assert!((p[0] - 0.8).abs() < 1e-12);
        assert_eq!(nb().predict(&x).unwrap(), vec![Label::NotSpam]);
    }

    #[test]
    fn nb_prediction_agrees_with_probabilities() {
        let x = features(&["free cash", "meet", "", "free meet", "cash cash meet"]);
        let model = nb();
        let labels = model.predict(&x).unwrap();
        let probas = model.predict_proba(&x).unwrap();
        for (label, p) in labels.iter().zip(&probas) {
            assert!(p[label.index()] >= 0.5);
        }
    }

    #[test]
    fn lr_thresholds_at_zero_decision() {
        let x = features(&["free cash", "meet", ""]);
        let model = lr();
        assert_eq!(
            model.predict(&x).unwrap(),
            vec![Label::Spam, Label::NotSpam, Label::NotSpam]
        );
        let p = model.predict_proba(&x).unwrap();
        assert!((p[2][1] - sigmoid(-1.0)).abs() < 1e-12);
    }

    #[test]
    fn feature_count_mismatch_is_an_error() {
        let mut model = lr();
        model.coef.push(0.0);
        let x = features(&["free"]);
        assert!(matches!(
            model.predict(&x),
            Err(ModelError::FeatureCount { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn model_spec_validation_checks_shapes() {
        let model = ModelSpec::MultinomialNb(nb());
        assert!(model.validate(3).is_ok());
        assert!(matches!(
            model.validate(4),
            Err(ModelError::ShapeMismatch { .. })
        ));

        let mut three_class = nb();
        three_class.class_log_prior.push(-1.0);
        assert!(ModelSpec::MultinomialNb(three_class).validate(3).is_err());
    }

    #[test]
    fn model_spec_validation_rejects_non_finite() {
        let mut model = lr();
        model.intercept = f64::INFINITY;
        assert!(matches!(
            ModelSpec::LogisticRegression(model).validate(3),
            Err(ModelError::NonFinite { .. })
        ));
    }

    #[test]
    fn model_spec_deserializes_by_kind() {
        let model: ModelSpec = serde_json::from_str(
            r#"{"kind": "logistic_regression", "coef": [1.0, 2.0], "intercept": 0.5}"#,
        )
        .unwrap();
        assert_eq!(model.kind(), "logistic_regression");
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn extreme_scores_stay_in_range() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        let p = softmax([-1000.0, 0.0]);
        assert!(p[1] > 0.999_999 && p[0] >= 0.0);
    }

    #[test]
    fn argmax_ties_go_to_not_spam() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
    }

    #[test]
    fn label_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Label::NotSpam).unwrap(), r#""not_spam""#);
        assert_eq!(serde_json::to_string(&Label::Spam).unwrap(), r#""spam""#);
    }
}
