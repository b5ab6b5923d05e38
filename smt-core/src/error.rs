//! Error types for the translation library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the translation library.
#[derive(Error, Debug)]
pub enum SmtError {
	/// Invalid caller input (mismatched corpus sizes, bad parameters).
	/// Fatal: nothing is trained when this is returned.
	#[error("Input error: {0}")]
	Input(String),

	/// Failure while counting on a worker thread
	#[error("Training error: {0}")]
	Training(String),

	/// I/O error with file context
	#[error("I/O error for {path}: {err}")]
	Io {
		path: PathBuf,
		#[source]
		err: std::io::Error,
	},

	/// Binary model cache encoding/decoding error
	#[error("Serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

impl SmtError {
	pub(crate) fn io<P: Into<PathBuf>>(path: P, err: std::io::Error) -> Self {
		SmtError::Io { path: path.into(), err }
	}

	/// Returns `true` for errors caused by the caller's input.
	pub fn is_input(&self) -> bool {
		matches!(self, SmtError::Input(_))
	}
}

/// Result type alias for translation operations.
pub type Result<T> = std::result::Result<T, SmtError>;
