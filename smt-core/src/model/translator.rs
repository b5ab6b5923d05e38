use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::decoder::{DecodeOptions, Decoded, decode_with_lm};
use super::language_model::LanguageModel;
use super::translation_model::TranslationTable;
use crate::corpus::{CorpusKey, ParallelCorpus, corpus_paths, load_parallel_corpus};
use crate::error::Result;
use crate::evaluation::{BleuResult, compute_bleu};
use crate::{TokenSeq, io, preprocess};

/// File name of the binary model cache written next to the source corpus file.
pub const MODEL_CACHE_FILE: &str = "model.bin";

/// Result of translating one raw sentence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Translation {
	/// Cleaned and tokenized input.
	pub source_tokens: TokenSeq,
	/// Decoded target tokens, same length as `source_tokens`.
	pub tokens: TokenSeq,
	/// `tokens` joined with single spaces.
	pub text: String,
	/// Language-model score of `tokens` (informational).
	pub fluency: f64,
	/// Positions copied through as out-of-vocabulary.
	pub oov: Vec<usize>,
}

/// Translation together with its BLEU score against a reference.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Evaluation {
	pub translation: Translation,
	pub reference_tokens: TokenSeq,
	pub bleu: BleuResult,
}

/// High-level translator owning a translation table and a language model.
///
/// # Responsibilities
/// - Train both models from a parallel corpus
/// - Reuse a binary cache when the corpus on disk has not changed
/// - Translate raw text and evaluate it against a reference
///
/// Both models are immutable after construction; a `Translator` can be shared
/// behind an `Arc` by any number of readers.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Translator {
	/// Identity of the corpus the models were trained on, if it came from disk.
	key: Option<CorpusKey>,
	table: TranslationTable,
	lm: LanguageModel,
}

impl Translator {
	/// Trains both models from an in-memory corpus.
	///
	/// The language model only sees the target side.
	pub fn train(corpus: &ParallelCorpus) -> Result<Self> {
		let table = TranslationTable::train_parallel(corpus.source(), corpus.target())?;
		let lm = LanguageModel::train(corpus.target());
		Ok(Self { key: None, table, lm })
	}

	/// Loads a translator for a corpus on disk.
	///
	/// - Reads `model.bin` next to `source_path` if it exists and was built
	///   from the same corpus files (same [`CorpusKey`])
	/// - Otherwise loads the corpus, trains, and rewrites the cache
	///
	/// Failing to write the cache is logged and otherwise ignored.
	///
	/// # Errors
	/// - `SmtError::Io` if the corpus files cannot be read
	/// - `SmtError::Input` if their line counts differ
	pub fn from_corpus<PS, PT>(source_path: PS, target_path: PT) -> Result<Self>
	where
		PS: AsRef<Path>,
		PT: AsRef<Path>,
	{
		let key = CorpusKey::from_paths(&source_path, &target_path)?;
		let cache_path = io::sibling_path(&source_path, MODEL_CACHE_FILE);

		if cache_path.exists() {
			match Self::read_cache(&cache_path) {
				Ok(cached) if cached.key.as_ref() == Some(&key) => {
					info!("loaded cached model from {}", cache_path.display());
					return Ok(cached);
				}
				Ok(_) => warn!("cached model {} is stale, retraining", cache_path.display()),
				Err(e) => warn!("ignoring unreadable model cache {}: {}", cache_path.display(), e),
			}
		}

		let corpus = load_parallel_corpus(&source_path, &target_path)?;
		let mut translator = Self::train(&corpus)?;
		translator.key = Some(key);

		if let Err(e) = translator.write_cache(&cache_path) {
			warn!("could not write model cache {}: {}", cache_path.display(), e);
		}
		Ok(translator)
	}

	/// Loads the named corpus under `data_dir`, see [`Translator::from_corpus`].
	pub fn from_directory<P: AsRef<Path>>(data_dir: P, name: &str) -> Result<Self> {
		let (source_path, target_path) = corpus_paths(data_dir, name)?;
		Self::from_corpus(source_path, target_path)
	}

	fn read_cache(path: &Path) -> Result<Self> {
		let bytes = io::read_bytes(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	fn write_cache(&self, path: &Path) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		io::write_bytes(path, &bytes)
	}

	pub fn key(&self) -> Option<&CorpusKey> {
		self.key.as_ref()
	}

	pub fn table(&self) -> &TranslationTable {
		&self.table
	}

	pub fn language_model(&self) -> &LanguageModel {
		&self.lm
	}

	/// Decodes already tokenized input.
	pub fn translate_tokens(&self, source: &[String], options: &DecodeOptions) -> Decoded {
		decode_with_lm(source, &self.table, &self.lm, options)
	}

	/// Cleans, tokenizes and decodes a raw sentence.
	pub fn translate(&self, text: &str, options: &DecodeOptions) -> Translation {
		let source_tokens = preprocess::prepare(text);
		let Decoded { tokens, fluency, oov } = self.translate_tokens(&source_tokens, options);
		Translation {
			text: tokens.join(" "),
			source_tokens,
			tokens,
			fluency,
			oov,
		}
	}

	/// Translates `text` and scores the result against `reference`.
	///
	/// The reference is cleaned and tokenized the same way as the input.
	pub fn evaluate(&self, text: &str, reference: &str, options: &DecodeOptions) -> Evaluation {
		let translation = self.translate(text, options);
		let reference_tokens = preprocess::prepare(reference);
		let bleu = compute_bleu(&translation.tokens, &reference_tokens);
		Evaluation { translation, reference_tokens, bleu }
	}
}
