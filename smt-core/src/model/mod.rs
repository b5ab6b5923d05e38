//! Top-level module for the translation system.
//!
//! This module provides:
//! - Word translation probabilities (`TranslationTable`)
//! - A bigram language model (`LanguageModel`)
//! - Greedy decoding (`decode`, `decode_with_lm`)
//! - A high-level interface bundling both models (`Translator`)

/// Source→target word probabilities estimated from co-occurrence counts.
///
/// Supports single-threaded and chunked parallel training,
/// presence-aware lookup and deterministic argmax.
pub mod translation_model;

/// Bigram log-probabilities over target sentences and fluency scoring.
pub mod language_model;

/// Word-by-word greedy decoding with an optional fluency side-channel.
pub mod decoder;

/// High-level interface owning both trained models.
///
/// Handles corpus loading, binary caching, translation and evaluation.
pub mod translator;

/// Internal co-occurrence accumulator.
///
/// Tracks per-pair and per-source counts and supports merging partial counts.
/// This module is not exposed publicly.
mod cooccurrence;

pub use decoder::{DecodeOptions, Decoded, decode, decode_with_lm};
pub use language_model::{DEFAULT_LOG_PROB, LanguageModel};
pub use translation_model::{TargetDistribution, TranslationTable};
pub use translator::{Evaluation, Translation, Translator};
