//! Parallel corpus loading.
//!
//! A corpus is a pair of UTF-8 text files with one sentence per line, where
//! line `i` of the source file translates to line `i` of the target file.
//! On disk a named corpus is a directory holding [`SOURCE_FILE`] and [`TARGET_FILE`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SmtError};
use crate::{TokenSeq, io, preprocess};

/// Source-side file name inside a corpus directory.
pub const SOURCE_FILE: &str = "source.txt";

/// Target-side file name inside a corpus directory.
pub const TARGET_FILE: &str = "target.txt";

/// Tokenized, line-aligned sentence pairs.
///
/// # Invariants
/// - `source` and `target` always have the same length
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParallelCorpus {
	source: Vec<TokenSeq>,
	target: Vec<TokenSeq>,
}

impl ParallelCorpus {
	/// Builds a corpus from already tokenized sentences.
	///
	/// # Errors
	/// Returns `SmtError::Input` if the two sides differ in length.
	pub fn new(source: Vec<TokenSeq>, target: Vec<TokenSeq>) -> Result<Self> {
		ensure_aligned(source.len(), target.len())?;
		Ok(Self { source, target })
	}

	pub fn source(&self) -> &[TokenSeq] {
		&self.source
	}

	pub fn target(&self) -> &[TokenSeq] {
		&self.target
	}

	/// Number of sentence pairs.
	pub fn len(&self) -> usize {
		self.source.len()
	}

	pub fn is_empty(&self) -> bool {
		self.source.is_empty()
	}

	/// Iterates over `(source, target)` sentence pairs in corpus order.
	pub fn pairs(&self) -> impl Iterator<Item = (&TokenSeq, &TokenSeq)> {
		self.source.iter().zip(self.target.iter())
	}

	pub fn into_parts(self) -> (Vec<TokenSeq>, Vec<TokenSeq>) {
		(self.source, self.target)
	}
}

/// Checks that both sides of a parallel corpus have the same number of sentences.
pub(crate) fn ensure_aligned(source_len: usize, target_len: usize) -> Result<()> {
	if source_len != target_len {
		return Err(SmtError::Input(format!(
			"source and target must have the same number of sentences (source={}, target={})",
			source_len, target_len
		)));
	}
	Ok(())
}

/// Loads and tokenizes a parallel corpus.
///
/// Every line is cleaned and tokenized with [`preprocess::prepare`]. Blank lines
/// become empty sentences so that line alignment is preserved.
///
/// # Errors
/// - `SmtError::Io` if either file cannot be read
/// - `SmtError::Input` if the files have different line counts
pub fn load_parallel_corpus<PS, PT>(source_path: PS, target_path: PT) -> Result<ParallelCorpus>
where
	PS: AsRef<Path>,
	PT: AsRef<Path>,
{
	let source_lines = io::read_file(&source_path)?;
	let target_lines = io::read_file(&target_path)?;
	ensure_aligned(source_lines.len(), target_lines.len())?;

	debug!(
		"loaded {} sentence pairs from {} / {}",
		source_lines.len(),
		source_path.as_ref().display(),
		target_path.as_ref().display()
	);

	let source = source_lines.iter().map(|line| preprocess::prepare(line)).collect();
	let target = target_lines.iter().map(|line| preprocess::prepare(line)).collect();
	ParallelCorpus::new(source, target)
}

/// Size and modification time of one corpus file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
struct FileStamp {
	path: PathBuf,
	len: u64,
	modified: Option<SystemTime>,
}

impl FileStamp {
	fn read(path: &Path) -> Result<Self> {
		let metadata = fs::metadata(path).map_err(|err| SmtError::io(path, err))?;
		// `data/./a` and `data/a` name the same corpus.
		let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
		Ok(Self {
			path,
			len: metadata.len(),
			modified: metadata.modified().ok(),
		})
	}
}

/// Identity of a corpus on disk.
///
/// Two keys are equal only if both files have the same path, size and
/// modification time. Used to validate binary model caches and to key
/// in-memory model stores.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CorpusKey {
	source: FileStamp,
	target: FileStamp,
}

impl CorpusKey {
	/// Reads file metadata for both sides of a corpus.
	pub fn from_paths<PS, PT>(source_path: PS, target_path: PT) -> Result<Self>
	where
		PS: AsRef<Path>,
		PT: AsRef<Path>,
	{
		Ok(Self {
			source: FileStamp::read(source_path.as_ref())?,
			target: FileStamp::read(target_path.as_ref())?,
		})
	}

	pub fn source_path(&self) -> &Path {
		&self.source.path
	}

	pub fn target_path(&self) -> &Path {
		&self.target.path
	}
}

/// Resolves the source and target file paths of a named corpus.
///
/// # Errors
/// Returns `SmtError::Input` if `name` is empty or would escape `data_dir`.
pub fn corpus_paths<P: AsRef<Path>>(data_dir: P, name: &str) -> Result<(PathBuf, PathBuf)> {
	let name = name.trim();
	if name.is_empty() || name == "." || name.contains("..") || name.contains(['/', '\\']) {
		return Err(SmtError::Input(format!("invalid corpus name: {:?}", name)));
	}
	let dir = io::normalize_folder(data_dir).join(name);
	Ok((dir.join(SOURCE_FILE), dir.join(TARGET_FILE)))
}

/// Lists the corpora available under `data_dir`, sorted by name.
pub fn list_corpora<P: AsRef<Path>>(data_dir: P) -> Result<Vec<String>> {
	io::list_dirs_containing(io::normalize_folder(data_dir), &[SOURCE_FILE, TARGET_FILE])
}
