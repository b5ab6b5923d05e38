use std::collections::HashMap;
use std::thread;

use log::info;
use serde::{Deserialize, Serialize};

use super::cooccurrence::CooccurrenceCounts;
use crate::TokenSeq;
use crate::corpus::ensure_aligned;
use crate::error::{Result, SmtError};

/// Probabilities of every target word observed with one source word.
///
/// # Invariants
/// - Every probability is in `(0, 1]`
/// - Probabilities sum to 1 (within floating tolerance)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TargetDistribution {
	probabilities: HashMap<String, f64>,
}

impl TargetDistribution {
	pub(crate) fn from_probabilities(probabilities: HashMap<String, f64>) -> Self {
		Self { probabilities }
	}

	/// Returns `P(target | source)`, or `None` if the pair was never observed.
	pub fn get(&self, target: &str) -> Option<f64> {
		self.probabilities.get(target).copied()
	}

	/// Iterates over `(target, probability)` in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.probabilities.iter().map(|(k, v)| (k.as_str(), *v))
	}

	pub fn len(&self) -> usize {
		self.probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.probabilities.is_empty()
	}

	/// Sum of all probabilities, 1.0 for a trained distribution.
	pub fn total(&self) -> f64 {
		self.probabilities.values().sum()
	}

	/// Returns the most probable target word.
	///
	/// Ties are broken by choosing the lexicographically smallest word, so the
	/// result does not depend on map iteration order.
	pub fn best(&self) -> Option<&str> {
		self.iter()
			.fold(None, |best: Option<(&str, f64)>, (word, probability)| match best {
				Some((best_word, best_probability))
					if best_probability > probability
						|| (best_probability == probability && best_word <= word) =>
				{
					Some((best_word, best_probability))
				}
				_ => Some((word, probability)),
			})
			.map(|(word, _)| word)
	}
}

/// Word translation table `P(target | source)`.
///
/// Estimated in a single pass: each source word of a sentence pair co-occurs with
/// every target word of that pair, and counts are normalized by the source word's
/// total co-occurrence count. There is no alignment model and no EM.
///
/// # Responsibilities
/// - Train from an aligned corpus (single-threaded or chunked in parallel)
/// - Distinguish unseen source words (`None`) from observed ones
/// - Provide a deterministic best translation per source word
///
/// # Invariants
/// - Immutable once trained; retraining builds a new table
/// - Source words never seen in training have no entry
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TranslationTable {
	entries: HashMap<String, TargetDistribution>,
}

impl TranslationTable {
	pub(crate) fn from_entries(entries: HashMap<String, TargetDistribution>) -> Self {
		Self { entries }
	}

	/// Trains the table on the calling thread.
	///
	/// # Errors
	/// Returns `SmtError::Input` if `source` and `target` differ in length.
	pub fn train(source: &[TokenSeq], target: &[TokenSeq]) -> Result<Self> {
		ensure_aligned(source.len(), target.len())?;

		let mut counts = CooccurrenceCounts::new();
		for (src_tokens, tgt_tokens) in source.iter().zip(target) {
			counts.add_pair(src_tokens, tgt_tokens);
		}

		let table = counts.into_table();
		info!("translation table trained: {} sentence pairs, {} source words", source.len(), table.len());
		Ok(table)
	}

	/// Trains the table by counting corpus chunks on separate threads.
	///
	/// # Behavior
	/// - Splits the corpus into chunks (based on CPU cores * factor)
	/// - Counts each chunk on its own scoped thread
	/// - Merges all partial counts, then normalizes once
	///
	/// Integer counts are merged before any division, so the result is
	/// identical to [`TranslationTable::train`].
	///
	/// # Errors
	/// - `SmtError::Input` if `source` and `target` differ in length
	/// - `SmtError::Training` if a worker thread panics
	pub fn train_parallel(source: &[TokenSeq], target: &[TokenSeq]) -> Result<Self> {
		ensure_aligned(source.len(), target.len())?;
		if source.is_empty() {
			return Ok(Self::default());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = source.len().div_ceil(chunks);

		let counts = thread::scope(|scope| {
			let handles: Vec<_> = source
				.chunks(chunk_size)
				.zip(target.chunks(chunk_size))
				.map(|(src_chunk, tgt_chunk)| {
					scope.spawn(move || {
						let mut partial = CooccurrenceCounts::new();
						for (src_tokens, tgt_tokens) in src_chunk.iter().zip(tgt_chunk) {
							partial.add_pair(src_tokens, tgt_tokens);
						}
						partial
					})
				})
				.collect();

			let mut merged = CooccurrenceCounts::new();
			for handle in handles {
				let partial = handle
					.join()
					.map_err(|_| SmtError::Training("counting thread panicked".to_owned()))?;
				merged.merge(partial);
			}
			Ok::<_, SmtError>(merged)
		})?;

		let table = counts.into_table();
		info!(
			"translation table trained on {} threads: {} sentence pairs, {} source words",
			source.len().div_ceil(chunk_size),
			source.len(),
			table.len()
		);
		Ok(table)
	}

	/// Returns the target distribution of `source`, or `None` if it is out of vocabulary.
	pub fn candidates(&self, source: &str) -> Option<&TargetDistribution> {
		self.entries.get(source)
	}

	/// Returns `P(target | source)`, or `None` if the pair was never observed.
	pub fn probability(&self, source: &str, target: &str) -> Option<f64> {
		self.entries.get(source)?.get(target)
	}

	/// Most probable translation of `source`, see [`TargetDistribution::best`].
	pub fn best_translation(&self, source: &str) -> Option<&str> {
		self.entries.get(source)?.best()
	}

	pub fn contains(&self, source: &str) -> bool {
		self.entries.contains_key(source)
	}

	/// Number of source words in the table.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over known source words in unspecified order.
	pub fn source_tokens(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}
