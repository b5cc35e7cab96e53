//! Shared types for the classification pipeline.

use serde::{Deserialize, Serialize};

use crate::model::Label;

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted label.
    pub label: Label,
    /// Probability of the predicted label as a percentage, in `[0, 100]`.
    pub confidence: f64,
    /// The normalized text the model saw.
    pub normalized: String,
}

impl Classification {
    pub fn is_spam(&self) -> bool {
        self.label == Label::Spam
    }
}
