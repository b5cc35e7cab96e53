//! Spam classifier. Normalizes a message and runs it through the fitted
//! vectorizer and model.
//!
//! Flow:
//! 1. `TextNormalizer::normalize()` → lowercase stems
//! 2. `TfidfVectorizer::transform()` on a one-element batch → one feature row
//! 3. `Classifier::predict()` / `predict_proba()` → label and confidence

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::types::Classification;
use crate::error::ModelError;
use crate::model::{Classifier, ModelArtifact, TfidfVectorizer};
use crate::text::TextNormalizer;

/// Classifies raw messages as spam or not spam.
pub struct SpamClassifier {
    normalizer: TextNormalizer,
    vectorizer: TfidfVectorizer,
    model: Arc<dyn Classifier>,
}

impl SpamClassifier {
    /// Build a classifier from a validated artifact.
    pub fn new(artifact: ModelArtifact) -> Self {
        Self::with_model(
            TextNormalizer::new(),
            artifact.vectorizer,
            Arc::new(artifact.model),
        )
    }

    /// Build a classifier from explicit parts.
    pub fn with_model(
        normalizer: TextNormalizer,
        vectorizer: TfidfVectorizer,
        model: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            normalizer,
            vectorizer,
            model,
        }
    }

    /// Load an artifact from disk and build a classifier from it.
    pub async fn from_path(path: &Path) -> Result<Self, ModelError> {
        Ok(Self::new(ModelArtifact::load(path).await?))
    }

    /// Classify one message.
    pub fn classify(&self, text: &str) -> Result<Classification, ModelError> {
        let normalized = self.normalizer.normalize(text);
        let features = self.vectorizer.transform(std::slice::from_ref(&normalized));

        let label = self
            .model
            .predict(&features)?
            .first()
            .copied()
            .ok_or(ModelError::EmptyPrediction)?;
        let proba = self
            .model
            .predict_proba(&features)?
            .first()
            .copied()
            .ok_or(ModelError::EmptyPrediction)?;

        let confidence = (proba[label.index()] * 100.0).clamp(0.0, 100.0);

        debug!(
            normalized = %normalized,
            label = %label,
            confidence,
            "Message classified"
        );

        Ok(Classification {
            label,
            confidence,
            normalized,
        })
    }
}
