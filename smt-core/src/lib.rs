//! Word-based statistical machine translation library.
//!
//! This crate provides a small translation system including:
//! - Word-to-word translation probabilities estimated from a parallel corpus
//! - A bigram language model over the target language
//! - Greedy, word-independent decoding with out-of-vocabulary pass-through
//! - BLEU evaluation (clipped n-gram precision and brevity penalty)
//!
//! Trained tables are immutable: they are built once from a corpus and can be
//! shared between any number of read-only callers.

/// Library error type and `Result` alias.
pub mod error;
pub use error::{Result, SmtError};

/// Text cleaning and whitespace tokenization.
pub mod preprocess;

/// Parallel corpus loading and corpus identity.
pub mod corpus;

/// Translation model, language model, decoder and high-level translator.
pub mod model;

/// BLEU and modified n-gram precision.
pub mod evaluation;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

/// Ordered list of word tokens. Zero-length sequences are valid.
pub type TokenSeq = Vec<String>;
