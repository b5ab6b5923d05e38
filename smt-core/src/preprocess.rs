//! Text cleaning and whitespace tokenization applied before any model sees a sentence.

use unicode_normalization::UnicodeNormalization;

use crate::TokenSeq;

/// Punctuation removed by [`clean_text`]. Other symbols are kept as part of words.
const STRIPPED_PUNCTUATION: [char; 9] = ['.', ',', '!', '?', ';', ':', '"', '(', ')'];

/// Normalizes a raw sentence.
///
/// - Unicode NFC composition (combining marks in Devanagari and Latin text are merged)
/// - Lowercasing
/// - Removal of sentence punctuation only
/// - Whitespace runs collapsed to a single space, ends trimmed
pub fn clean_text(sentence: &str) -> String {
	if sentence.is_empty() {
		return String::new();
	}

	let lowered = sentence.nfc().collect::<String>().to_lowercase();
	let stripped: String = lowered
		.chars()
		.filter(|c| !STRIPPED_PUNCTUATION.contains(c))
		.collect();

	stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a cleaned sentence on whitespace.
pub fn tokenize(sentence: &str) -> TokenSeq {
	sentence.split_whitespace().map(str::to_owned).collect()
}

/// Tokenizes every sentence of a list.
pub fn tokenize_sentences<S: AsRef<str>>(sentences: &[S]) -> Vec<TokenSeq> {
	sentences.iter().map(|s| tokenize(s.as_ref())).collect()
}

/// Cleans then tokenizes a raw sentence.
pub fn prepare(sentence: &str) -> TokenSeq {
	tokenize(&clean_text(sentence))
}
