use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::TokenSeq;

/// Log-probability charged for a bigram never seen in training.
pub const DEFAULT_LOG_PROB: f64 = -10.0;

/// Bigram language model over target-language sentences.
///
/// Stores `ln(count(w1, w2) / count(w1))` for every adjacent pair observed
/// inside a training sentence. Pairs across sentence boundaries are never counted.
///
/// # Invariants
/// - Only observed bigrams are stored, absence means "unseen"
/// - Every stored value is `<= 0.0`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LanguageModel {
	/// Two-level map: `bigrams[w1][w2]` is the log-probability of `w2` after `w1`.
	bigrams: HashMap<String, HashMap<String, f64>>,
}

impl LanguageModel {
	/// Trains the model from tokenized target sentences.
	///
	/// Unigram counts include every token, the last one of each sentence too,
	/// so the successors of a sentence-final word may not sum to probability 1.
	pub fn train(sentences: &[TokenSeq]) -> Self {
		let mut unigram_counts: HashMap<&str, usize> = HashMap::new();
		let mut bigram_counts: HashMap<(&str, &str), usize> = HashMap::new();

		for tokens in sentences {
			for token in tokens {
				*unigram_counts.entry(token.as_str()).or_insert(0) += 1;
			}
			for pair in tokens.windows(2) {
				*bigram_counts.entry((pair[0].as_str(), pair[1].as_str())).or_insert(0) += 1;
			}
		}

		let mut bigrams: HashMap<String, HashMap<String, f64>> = HashMap::new();
		let mut stored = 0;
		for ((w1, w2), count) in bigram_counts {
			// w1 was counted as a unigram in the same sentence
			let history = unigram_counts.get(w1).copied().unwrap_or(count);
			let probability = count as f64 / history as f64;
			bigrams
				.entry(w1.to_owned())
				.or_default()
				.insert(w2.to_owned(), probability.ln());
			stored += 1;
		}

		info!("language model trained: {} sentences, {} bigrams", sentences.len(), stored);
		Self { bigrams }
	}

	/// Returns `ln P(w2 | w1)`, or `None` if the bigram was never observed.
	pub fn log_prob(&self, w1: &str, w2: &str) -> Option<f64> {
		self.bigrams.get(w1)?.get(w2).copied()
	}

	/// Sums bigram log-probabilities over a sentence.
	///
	/// Unseen bigrams contribute `default_log_prob`. Sentences shorter than two
	/// tokens have no bigrams and score `0.0`.
	pub fn score(&self, tokens: &[String], default_log_prob: f64) -> f64 {
		tokens
			.windows(2)
			.map(|pair| self.log_prob(&pair[0], &pair[1]).unwrap_or(default_log_prob))
			.sum()
	}

	/// Number of stored bigrams.
	pub fn len(&self) -> usize {
		self.bigrams.values().map(HashMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.bigrams.is_empty()
	}
}
