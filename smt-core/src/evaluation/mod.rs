//! Translation quality metrics.
//!
//! Sentence-level BLEU against a single reference:
//! - Modified (clipped) n-gram precision (`ngram`)
//! - Brevity penalty and geometric-mean aggregation (`bleu`)

/// N-gram extraction and clipped precision.
pub mod ngram;

/// BLEU score, brevity penalty and the result record.
pub mod bleu;

pub use bleu::{BleuResult, MAX_ORDER, brevity_penalty, compute_bleu, compute_bleu_with_order};
pub use ngram::{modified_precision, ngrams};
