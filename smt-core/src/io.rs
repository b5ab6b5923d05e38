use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::env;

use crate::error::{Result, SmtError};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|err| SmtError::io(path, err))?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds a path to `file_name` inside the directory holding `input_path`.
///
/// Example:
/// `data/en-hi/source.txt` + `"model.bin"` → `data/en-hi/model.bin`
pub(crate) fn sibling_path<P: AsRef<Path>>(input_path: P, file_name: &str) -> PathBuf {
	let parent = input_path.as_ref().parent().unwrap_or_else(|| Path::new("."));
	parent.join(file_name)
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists the sub-directories of `dir` that contain every file in `required`.
///
/// Returns directory names only (no paths), sorted.
pub(crate) fn list_dirs_containing<P: AsRef<Path>>(dir: P, required: &[&str]) -> Result<Vec<String>> {
	let dir = dir.as_ref();
	let mut names = Vec::new();

	for entry in fs::read_dir(dir).map_err(|err| SmtError::io(dir, err))? {
		let path = entry.map_err(|err| SmtError::io(dir, err))?.path();
		if !path.is_dir() || !required.iter().all(|file| path.join(file).is_file()) {
			continue;
		}
		if let Some(name) = path.file_name() {
			names.push(name.to_string_lossy().to_string());
		}
	}

	names.sort();
	Ok(names)
}

/// Reads a binary file into memory.
pub(crate) fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
	let path = path.as_ref();
	fs::read(path).map_err(|err| SmtError::io(path, err))
}

/// Writes a binary file, replacing any previous content.
pub(crate) fn write_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
	let path = path.as_ref();
	fs::write(path, bytes).map_err(|err| SmtError::io(path, err))
}
