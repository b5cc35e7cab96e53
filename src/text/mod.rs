//! Text analysis pipeline.
//!
//! - **Tokenizer**: Treebank-style word tokenization
//! - **Stopwords**: the fixed English stopword list
//! - **Porter**: rule-based suffix stripping
//! - **Normalizer**: lowercase, tokenize, filter, stem

pub mod normalizer;
pub mod porter;
pub mod stopwords;
pub mod tokenizer;

pub use normalizer::TextNormalizer;
pub use porter::PorterStemmer;
pub use tokenizer::WordTokenizer;
