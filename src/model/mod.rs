//! Fitted model artifacts: TF-IDF vectorizer, classifiers, and the
//! versioned JSON loader.

pub mod artifact;
pub mod classifier;
pub mod vectorizer;

pub use artifact::{FORMAT_VERSION, ModelArtifact};
pub use classifier::{Classifier, Label, LogisticRegression, ModelSpec, MultinomialNb};
pub use vectorizer::{FeatureMatrix, Norm, SparseRow, TfidfVectorizer};
