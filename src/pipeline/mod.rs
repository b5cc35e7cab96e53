//! Message classification pipeline.
//!
//! Every message flows through:
//! 1. `TextNormalizer` lowercases, tokenizes, filters and stems
//! 2. `TfidfVectorizer` turns the stems into one weighted feature row
//! 3. `Classifier` picks a label and its probability

pub mod classifier;
pub mod types;

pub use classifier::SpamClassifier;
pub use types::Classification;
