use log::debug;
use serde::{Deserialize, Serialize};

use super::language_model::{DEFAULT_LOG_PROB, LanguageModel};
use super::translation_model::TranslationTable;
use crate::TokenSeq;

/// Decoding configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodeOptions {
	/// Log-probability charged for unseen bigrams when computing fluency.
	pub default_log_prob: f64,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self { default_log_prob: DEFAULT_LOG_PROB }
	}
}

/// Output of [`decode_with_lm`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decoded {
	/// Decoded target tokens, one per source token.
	pub tokens: TokenSeq,
	/// Language-model score of `tokens`. Informational only.
	pub fluency: f64,
	/// Positions of source tokens copied through as out-of-vocabulary.
	pub oov: Vec<usize>,
}

/// Translates each source token independently.
///
/// - Known tokens become their most probable target word
///   (ties: lexicographically smallest word)
/// - Unknown tokens are copied verbatim at the same position
///
/// The output always has the same length as the input.
pub fn decode(source: &[String], table: &TranslationTable) -> TokenSeq {
	source
		.iter()
		.map(|word| match table.best_translation(word) {
			Some(best) => best.to_owned(),
			None => word.clone(),
		})
		.collect()
}

/// Decodes like [`decode`] and reports the fluency of the result.
///
/// The language model never changes which words are chosen; it only scores
/// the greedy candidate.
pub fn decode_with_lm(
	source: &[String],
	table: &TranslationTable,
	lm: &LanguageModel,
	options: &DecodeOptions,
) -> Decoded {
	let tokens = decode(source, table);
	let oov: Vec<usize> = source
		.iter()
		.enumerate()
		.filter(|(_, word)| !table.contains(word))
		.map(|(position, _)| position)
		.collect();
	let fluency = lm.score(&tokens, options.default_log_prob);

	debug!("decoded {} tokens ({} oov), fluency {:.4}", tokens.len(), oov.len(), fluency);
	Decoded { tokens, fluency, oov }
}
