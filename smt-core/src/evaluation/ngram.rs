use std::collections::HashMap;

/// Counts the n-grams of order `n` in `tokens`.
///
/// Keys borrow slices of `tokens`. The map is empty when `n == 0` or when
/// `tokens` is shorter than `n`.
pub fn ngrams(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
	let mut counts = HashMap::new();
	if n == 0 || tokens.len() < n {
		return counts;
	}

	for window in tokens.windows(n) {
		*counts.entry(window).or_insert(0) += 1;
	}
	counts
}

/// Modified n-gram precision of `candidate` against `reference`.
///
/// Each candidate n-gram is credited at most as many times as it occurs in the
/// reference. Returns `0.0` when the candidate has no n-gram of order `n`.
pub fn modified_precision(candidate: &[String], reference: &[String], n: usize) -> f64 {
	let candidate_ngrams = ngrams(candidate, n);
	if candidate_ngrams.is_empty() {
		return 0.0;
	}
	let reference_ngrams = ngrams(reference, n);

	let clipped: usize = candidate_ngrams
		.iter()
		.map(|(ngram, count)| (*count).min(reference_ngrams.get(ngram).copied().unwrap_or(0)))
		.sum();
	let total: usize = candidate_ngrams.values().sum();

	clipped as f64 / total as f64
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(sentence: &str) -> Vec<String> {
		sentence.split_whitespace().map(str::to_owned).collect()
	}

	#[test]
	fn counts_repeated_ngrams() {
		let sentence = tokens("the cat the cat");
		let bigrams = ngrams(&sentence, 2);
		assert_eq!(bigrams.len(), 2);
		assert_eq!(bigrams[&sentence[0..2]], 2);
		assert_eq!(bigrams[&sentence[1..3]], 1);
	}

	#[test]
	fn no_ngrams_for_short_input_or_zero_order() {
		assert!(ngrams(&tokens("a b"), 3).is_empty());
		assert!(ngrams(&tokens("a b"), 0).is_empty());
		assert!(ngrams(&[], 1).is_empty());
	}

	#[test]
	fn clipping_caps_at_reference_count() {
		let precision = modified_precision(&tokens("the the the"), &tokens("the the"), 1);
		assert_eq!(precision, 2.0 / 3.0);
	}

	#[test]
	fn precision_per_order() {
		let candidate = tokens("the cat is on the mat");
		let reference = tokens("the cat sat on the mat");
		assert_eq!(modified_precision(&candidate, &reference, 1), 5.0 / 6.0);
		assert_eq!(modified_precision(&candidate, &reference, 2), 3.0 / 5.0);
		assert_eq!(modified_precision(&candidate, &reference, 3), 1.0 / 4.0);
		assert_eq!(modified_precision(&candidate, &reference, 4), 0.0);
	}

	#[test]
	fn short_or_empty_candidate_has_zero_precision() {
		assert_eq!(modified_precision(&[], &tokens("a b"), 1), 0.0);
		assert_eq!(modified_precision(&tokens("a b"), &tokens("a b c"), 3), 0.0);
	}

	#[test]
	fn empty_reference_matches_nothing() {
		assert_eq!(modified_precision(&tokens("a b"), &[], 1), 0.0);
	}
}
