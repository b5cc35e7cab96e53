//! Error types for spam-sift.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while loading a model artifact or running inference.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid vectorizer: {0}")]
    InvalidVectorizer(String),

    #[error("Model shape mismatch for {field}: expected {expected}, got {actual}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite value in {field}")]
    NonFinite { field: String },

    #[error("Feature matrix has {actual} columns, model expects {expected}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Inference produced no rows for a non-empty batch")]
    EmptyPrediction,
}

/// Errors from the classification history and its flat log.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to write classification log {path}: {source}")]
    LogWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
