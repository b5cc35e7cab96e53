//! Versioned model artifact loader.
//!
//! An artifact is one JSON document carrying a fitted TF-IDF vectorizer and
//! a fitted classifier. The format version is checked before the rest of
//! the document is interpreted, so an artifact from a newer writer fails
//! with a version error rather than a confusing field error.

use std::path::Path;

use serde::Deserialize;
use tokio::fs;
use tracing::info;

use super::classifier::{Classifier, ModelSpec};
use super::vectorizer::TfidfVectorizer;
use crate::error::ModelError;

/// The artifact format this build reads.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct VersionHeader {
    format_version: u32,
}

/// A fitted vectorizer plus a fitted model.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub vectorizer: TfidfVectorizer,
    pub model: ModelSpec,
}

impl ModelArtifact {
    /// Read and validate an artifact from disk.
    pub async fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|source| ModelError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let artifact = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            model = artifact.model.kind(),
            features = artifact.vectorizer.n_features(),
            "Model artifact loaded"
        );
        Ok(artifact)
    }

    /// Parse and validate an artifact from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;

        let header: VersionHeader = serde_json::from_value(value.clone())?;
        if header.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let artifact: Self = serde_json::from_value(value)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the vectorizer and model agree with each other.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.vectorizer.validate()?;
        self.model.validate(self.vectorizer.n_features())?;
        debug_assert_eq!(self.model.n_features(), self.vectorizer.n_features());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NB_ARTIFACT: &str = r#"{
        "format_version": 1,
        "vectorizer": {
            "vocabulary": {"cash": 0, "free": 1, "meet": 2},
            "idf": [1.5, 1.2, 2.0],
            "norm": "l2",
            "sublinear_tf": false
        },
        "model": {
            "kind": "multinomial_nb",
            "class_log_prior": [-0.15, -1.97],
            "feature_log_prob": [[-6.0, -6.0, -1.0], [-1.0, -1.0, -6.0]]
        }
    }"#;

    #[test]
    fn parses_valid_artifact() {
        let artifact = ModelArtifact::from_json(NB_ARTIFACT).unwrap();
        assert_eq!(artifact.format_version, FORMAT_VERSION);
        assert_eq!(artifact.vectorizer.n_features(), 3);
        assert_eq!(artifact.model.kind(), "multinomial_nb");
    }

    #[test]
    fn norm_and_sublinear_default_when_omitted() {
        let raw = r#"{
            "format_version": 1,
            "vectorizer": {"vocabulary": {"free": 0}, "idf": [1.0]},
            "model": {"kind": "logistic_regression", "coef": [2.0], "intercept": 0.0}
        }"#;
        let artifact = ModelArtifact::from_json(raw).unwrap();
        assert_eq!(artifact.vectorizer.norm, crate::model::vectorizer::Norm::L2);
        assert!(!artifact.vectorizer.sublinear_tf);
    }

    #[test]
    fn rejects_unknown_version_before_parsing_body() {
        let raw = r#"{"format_version": 2, "something_new": true}"#;
        assert!(matches!(
            ModelArtifact::from_json(raw),
            Err(ModelError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn rejects_missing_version() {
        let raw = r#"{"vectorizer": {}, "model": {}}"#;
        assert!(matches!(ModelArtifact::from_json(raw), Err(ModelError::Json(_))));
    }

    #[test]
    fn rejects_model_shape_mismatch() {
        let raw = NB_ARTIFACT.replace("[-1.0, -1.0, -6.0]", "[-1.0, -1.0]");
        assert!(matches!(
            ModelArtifact::from_json(&raw),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_unknown_model_kind() {
        let raw = NB_ARTIFACT.replace("multinomial_nb", "random_forest");
        assert!(matches!(ModelArtifact::from_json(&raw), Err(ModelError::Json(_))));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(NB_ARTIFACT.as_bytes()).unwrap();

        let artifact = ModelArtifact::load(file.path()).await.unwrap();
        assert_eq!(artifact.vectorizer.vocabulary["meet"], 2);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelArtifact::load(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Read { .. }));
    }
}
