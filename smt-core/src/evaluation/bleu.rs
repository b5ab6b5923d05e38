use serde::{Deserialize, Serialize};

use super::ngram::modified_precision;
use crate::error::{Result, SmtError};

/// Highest n-gram order used by standard BLEU.
pub const MAX_ORDER: usize = 4;

/// Sentence-level BLEU score and its components.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BleuResult {
	bleu: f64,
	brevity_penalty: f64,
	/// `precisions[n - 1]` is the modified precision of order `n`.
	precisions: Vec<f64>,
}

impl BleuResult {
	pub fn bleu(&self) -> f64 {
		self.bleu
	}

	pub fn brevity_penalty(&self) -> f64 {
		self.brevity_penalty
	}

	pub fn precisions(&self) -> &[f64] {
		&self.precisions
	}

	/// Modified precision of order `n` (1-based), or `None` if `n` is out of range.
	pub fn precision(&self, n: usize) -> Option<f64> {
		self.precisions.get(n.checked_sub(1)?).copied()
	}

	pub fn max_order(&self) -> usize {
		self.precisions.len()
	}
}

/// Brevity penalty for a candidate of `candidate_len` tokens against a
/// reference of `reference_len` tokens.
///
/// - `0.0` for an empty candidate
/// - `1.0` when the candidate is strictly longer
/// - `exp(1 - r / c)` otherwise (`1.0` at equal lengths)
pub fn brevity_penalty(candidate_len: usize, reference_len: usize) -> f64 {
	if candidate_len == 0 {
		return 0.0;
	}
	if candidate_len > reference_len {
		return 1.0;
	}
	(1.0 - reference_len as f64 / candidate_len as f64).exp()
}

/// Computes BLEU with n-gram orders 1 to [`MAX_ORDER`].
pub fn compute_bleu(candidate: &[String], reference: &[String]) -> BleuResult {
	bleu_up_to(candidate, reference, MAX_ORDER)
}

/// Computes BLEU with n-gram orders 1 to `max_order`.
///
/// # Errors
/// Returns `SmtError::Input` if `max_order` is 0.
pub fn compute_bleu_with_order(candidate: &[String], reference: &[String], max_order: usize) -> Result<BleuResult> {
	if max_order == 0 {
		return Err(SmtError::Input("BLEU order must be at least 1".to_owned()));
	}
	Ok(bleu_up_to(candidate, reference, max_order))
}

fn bleu_up_to(candidate: &[String], reference: &[String], max_order: usize) -> BleuResult {
	let precisions: Vec<f64> = (1..=max_order)
		.map(|n| modified_precision(candidate, reference, n))
		.collect();
	let brevity_penalty = brevity_penalty(candidate.len(), reference.len());

	// Any zero precision would need ln(0): the score is defined as 0
	let bleu = if precisions.iter().any(|&p| p == 0.0) {
		0.0
	} else {
		let mean_log = precisions.iter().map(|p| p.ln()).sum::<f64>() / max_order as f64;
		brevity_penalty * mean_log.exp()
	};

	BleuResult { bleu, brevity_penalty, precisions }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(sentence: &str) -> Vec<String> {
		sentence.split_whitespace().map(str::to_owned).collect()
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn brevity_penalty_cases() {
		assert_eq!(brevity_penalty(0, 5), 0.0);
		assert_eq!(brevity_penalty(0, 0), 0.0);
		assert_eq!(brevity_penalty(6, 5), 1.0);
		assert_eq!(brevity_penalty(5, 5), 1.0);
		assert!(close(brevity_penalty(3, 6), (-1.0f64).exp()));
		assert!(close(brevity_penalty(3, 6), 0.36787944117));
	}

	#[test]
	fn identical_sentences_score_one() {
		let sentence = tokens("the quick brown fox jumps");
		let result = compute_bleu(&sentence, &sentence);
		assert!(close(result.bleu(), 1.0));
		assert_eq!(result.brevity_penalty(), 1.0);
		assert_eq!(result.precisions(), &[1.0, 1.0, 1.0, 1.0]);
	}

	#[test]
	fn zero_precision_forces_zero_bleu() {
		let candidate = tokens("the cat is on the mat");
		let reference = tokens("the cat sat on the mat");
		let result = compute_bleu(&candidate, &reference);

		assert_eq!(result.precision(1), Some(5.0 / 6.0));
		assert_eq!(result.precision(2), Some(3.0 / 5.0));
		assert_eq!(result.precision(3), Some(1.0 / 4.0));
		assert_eq!(result.precision(4), Some(0.0));
		assert_eq!(result.brevity_penalty(), 1.0);
		assert_eq!(result.bleu(), 0.0);
	}

	#[test]
	fn geometric_mean_of_precisions() {
		let result = compute_bleu(&tokens("a b c d x"), &tokens("a b c d e"));
		let expected = (0.8f64 * 0.75 * (2.0 / 3.0) * 0.5).powf(0.25);
		assert!(close(result.bleu(), expected), "got {}", result.bleu());
	}

	#[test]
	fn short_candidate_is_penalized() {
		let result = compute_bleu(&tokens("the cat sat on the"), &tokens("the cat sat on the mat"));
		assert_eq!(result.precisions(), &[1.0, 1.0, 1.0, 1.0]);
		assert!(close(result.brevity_penalty(), (-0.2f64).exp()));
		assert!(close(result.bleu(), (-0.2f64).exp()));
	}

	#[test]
	fn empty_candidate_scores_zero_everywhere() {
		let result = compute_bleu(&[], &tokens("a reference"));
		assert_eq!(result.bleu(), 0.0);
		assert_eq!(result.brevity_penalty(), 0.0);
		assert!(result.precisions().iter().all(|&p| p == 0.0));
	}

	#[test]
	fn empty_reference_scores_zero() {
		let result = compute_bleu(&tokens("a b c d"), &[]);
		assert_eq!(result.bleu(), 0.0);
		assert_eq!(result.brevity_penalty(), 1.0);
	}

	#[test]
	fn custom_order() {
		let result = compute_bleu_with_order(&tokens("the cat is on the mat"), &tokens("the cat sat on the mat"), 2).unwrap();
		assert_eq!(result.max_order(), 2);
		assert!(close(result.bleu(), ((5.0f64 / 6.0) * (3.0 / 5.0)).sqrt()));
		assert_eq!(result.precision(3), None);
		assert_eq!(result.precision(0), None);
		assert!(compute_bleu_with_order(&[], &[], 0).unwrap_err().is_input());
	}
}
