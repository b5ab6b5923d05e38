use std::collections::HashMap;

use super::translation_model::{TargetDistribution, TranslationTable};

/// Running co-occurrence counts between source and target words.
///
/// Every source word of a sentence pair is paired with every target word of the
/// same pair (full cross-product, no alignment).
///
/// ## Responsibilities:
/// - Accumulate `co(s, t)` and `total(s)` during training
/// - Merge with another accumulator (parallel training support)
/// - Normalize into a `TranslationTable`
///
/// ## Invariants
/// - `totals[s]` equals the sum of `pairs[s][*]`
/// - Every count is strictly positive
#[derive(Clone, Debug, Default)]
pub(crate) struct CooccurrenceCounts {
	/// Example: { "hello" => { "namaste" => 3, "duniya" => 1 } }
	pairs: HashMap<String, HashMap<String, usize>>,
	totals: HashMap<String, usize>,
}

impl CooccurrenceCounts {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one aligned sentence pair.
	///
	/// A pair with an empty target side contributes nothing, so source words
	/// seen only there stay out of the table.
	pub fn add_pair(&mut self, source: &[String], target: &[String]) {
		if target.is_empty() {
			return;
		}

		for src_word in source {
			let row = self.pairs.entry(src_word.clone()).or_default();
			for tgt_word in target {
				*row.entry(tgt_word.clone()).or_insert(0) += 1;
			}
			*self.totals.entry(src_word.clone()).or_insert(0) += target.len();
		}
	}

	/// Merges another accumulator into this one. Counts are summed.
	pub fn merge(&mut self, other: Self) {
		for (src_word, row) in other.pairs {
			let existing = self.pairs.entry(src_word).or_default();
			for (tgt_word, count) in row {
				*existing.entry(tgt_word).or_insert(0) += count;
			}
		}
		for (src_word, total) in other.totals {
			*self.totals.entry(src_word).or_insert(0) += total;
		}
	}

	/// Converts counts into probabilities `co(s, t) / total(s)`.
	pub fn into_table(self) -> TranslationTable {
		let Self { pairs, totals } = self;

		let entries = pairs
			.into_iter()
			.map(|(src_word, row)| {
				// totals and pairs are filled together, a missing total cannot happen
				let total = totals.get(&src_word).copied().unwrap_or(0).max(1) as f64;
				let probabilities = row
					.into_iter()
					.map(|(tgt_word, count)| (tgt_word, count as f64 / total))
					.collect();
				(src_word, TargetDistribution::from_probabilities(probabilities))
			})
			.collect();

		TranslationTable::from_entries(entries)
	}
}
