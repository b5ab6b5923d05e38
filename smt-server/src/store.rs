use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::info;
use smt_core::corpus::{CorpusKey, corpus_paths};
use smt_core::model::Translator;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Trained translators memoized by corpus identity.
///
/// Created at service start and dropped at shutdown. A corpus whose files are
/// unchanged maps to the stored translator; a modified corpus gets a new key and
/// its translator replaces the old entry for that name.
///
/// The store never trains: callers train outside its lock and hand the result
/// to [`ModelStore::insert`].
#[derive(Debug, Default)]
pub struct ModelStore {
	models: HashMap<CorpusKey, Arc<Translator>>,
	names: HashMap<String, CorpusKey>,
	active: Option<String>,
}

impl ModelStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the stored translator for `key`, recording it under `name`.
	pub fn cached(&mut self, name: &str, key: &CorpusKey) -> Option<Arc<Translator>> {
		let translator = self.models.get(key)?.clone();
		self.bind_name(name, key);
		Some(translator)
	}

	/// Stores a freshly trained translator under `name`.
	///
	/// If another request stored the same corpus meanwhile, that translator is
	/// kept and returned instead.
	pub fn insert(&mut self, name: &str, key: CorpusKey, translator: Arc<Translator>) -> Arc<Translator> {
		let stored = self.models.entry(key.clone()).or_insert(translator).clone();
		self.bind_name(name, &key);
		info!("{} trained models in memory", self.len());
		stored
	}

	fn bind_name(&mut self, name: &str, key: &CorpusKey) {
		if let Some(previous) = self.names.insert(name.to_owned(), key.clone()) {
			if previous != *key {
				self.models.remove(&previous);
			}
		}
	}

	/// Makes `name` the corpus used by requests that do not name one.
	pub fn activate(&mut self, name: &str) {
		self.active = Some(name.to_owned());
	}

	/// Currently active corpus name and translator.
	pub fn active(&self) -> Option<(String, Arc<Translator>)> {
		let name = self.active.as_ref()?;
		let translator = self.models.get(self.names.get(name)?)?;
		Some((name.clone(), translator.clone()))
	}

	/// Names of loaded corpora, sorted.
	pub fn loaded_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.names.keys().cloned().collect();
		names.sort();
		names
	}

	/// Number of trained translators held in memory.
	pub fn len(&self) -> usize {
		self.models.len()
	}
}

/// State shared by all HTTP workers.
///
/// The store lock is only held for map lookups and inserts, never while a
/// corpus is read or trained.
pub struct AppState {
	pub config: ServerConfig,
	store: Mutex<ModelStore>,
}

impl AppState {
	pub fn new(config: ServerConfig) -> Self {
		Self { config, store: Mutex::new(ModelStore::new()) }
	}

	fn store(&self) -> Result<MutexGuard<'_, ModelStore>, ApiError> {
		self.store.lock().map_err(|_| ApiError::Lock)
	}

	/// Returns the translator for `name`, training it if its files changed or
	/// were never seen. Does not change the active corpus.
	pub fn get_or_train(&self, name: &str) -> Result<Arc<Translator>, ApiError> {
		let name = name.trim();
		let (source_path, target_path) = corpus_paths(&self.config.data_dir, name)?;
		let key = CorpusKey::from_paths(&source_path, &target_path)?;

		if let Some(translator) = self.store()?.cached(name, &key) {
			info!("corpus '{}' unchanged, reusing trained model", name);
			return Ok(translator);
		}

		info!("training corpus '{}'", name);
		let translator = Arc::new(Translator::from_corpus(&source_path, &target_path)?);
		Ok(self.store()?.insert(name, key, translator))
	}

	/// Like [`AppState::get_or_train`], then makes `name` the active corpus.
	pub fn load(&self, name: &str) -> Result<Arc<Translator>, ApiError> {
		let translator = self.get_or_train(name)?;
		self.store()?.activate(name.trim());
		Ok(translator)
	}

	pub fn active(&self) -> Result<Option<(String, Arc<Translator>)>, ApiError> {
		Ok(self.store()?.active())
	}

	pub fn loaded_names(&self) -> Result<Vec<String>, ApiError> {
		Ok(self.store()?.loaded_names())
	}

	#[cfg(test)]
	fn model_count(&self) -> usize {
		self.store.lock().map(|store| store.len()).unwrap_or(0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use smt_core::corpus::{SOURCE_FILE, TARGET_FILE};
	use std::fs;
	use std::path::Path;

	fn write_corpus(data_dir: &Path, name: &str, source: &str, target: &str) {
		let dir = data_dir.join(name);
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join(SOURCE_FILE), source).unwrap();
		fs::write(dir.join(TARGET_FILE), target).unwrap();
	}

	fn state(data_dir: &Path) -> AppState {
		AppState::new(ServerConfig::with_data_dir(data_dir))
	}

	#[test]
	fn unchanged_corpus_is_reused() {
		let dir = tempfile::tempdir().unwrap();
		write_corpus(dir.path(), "en-hi", "hello world\n", "namaste duniya\n");
		let state = state(dir.path());

		let first = state.load("en-hi").unwrap();
		let second = state.load("en-hi").unwrap();
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(state.model_count(), 1);
		assert_eq!(state.active().unwrap().unwrap().0, "en-hi");
	}

	#[test]
	fn modified_corpus_replaces_old_model() {
		let dir = tempfile::tempdir().unwrap();
		write_corpus(dir.path(), "en-hi", "hello world\n", "namaste duniya\n");
		let state = state(dir.path());
		let first = state.load("en-hi").unwrap();

		write_corpus(dir.path(), "en-hi", "hello world\ngood night\n", "namaste duniya\nshubh ratri\n");
		let second = state.load("en-hi").unwrap();

		assert!(!Arc::ptr_eq(&first, &second));
		assert!(second.table().contains("night"));
		assert_eq!(state.model_count(), 1);
	}

	#[test]
	fn loading_switches_active_corpus() {
		let dir = tempfile::tempdir().unwrap();
		write_corpus(dir.path(), "a", "x\n", "y\n");
		write_corpus(dir.path(), "b", "x\n", "z\n");
		let state = state(dir.path());

		assert!(state.active().unwrap().is_none());
		state.load("a").unwrap();
		state.load("b").unwrap();
		assert_eq!(state.loaded_names().unwrap(), vec!["a".to_owned(), "b".to_owned()]);
		assert_eq!(state.active().unwrap().unwrap().0, "b");
	}

	#[test]
	fn get_or_train_keeps_active_corpus() {
		let dir = tempfile::tempdir().unwrap();
		write_corpus(dir.path(), "a", "x\n", "y\n");
		write_corpus(dir.path(), "b", "x\n", "z\n");
		let state = state(dir.path());

		state.load("a").unwrap();
		let other = state.get_or_train("b").unwrap();
		assert_eq!(other.table().best_translation("x"), Some("z"));
		assert_eq!(state.active().unwrap().unwrap().0, "a");
		assert_eq!(state.model_count(), 2);
	}

	#[test]
	fn store_is_usable_while_a_model_is_trained() {
		let dir = tempfile::tempdir().unwrap();
		write_corpus(dir.path(), "a", "x\n", "y\n");
		let state = state(dir.path());
		state.load("a").unwrap();

		// Training happens between these two calls; the lock is free in between.
		let (source, target) = corpus_paths(dir.path(), "a").unwrap();
		let key = CorpusKey::from_paths(&source, &target).unwrap();
		let trained = Arc::new(Translator::from_corpus(&source, &target).unwrap());
		assert!(state.store.try_lock().is_ok());

		let stored = state.store().unwrap().insert("a", key, trained.clone());
		assert!(!Arc::ptr_eq(&stored, &trained));
		assert_eq!(state.model_count(), 1);
	}

	#[test]
	fn missing_corpus_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let state = state(dir.path());
		assert!(state.get_or_train("nope").is_err());
		assert_eq!(state.model_count(), 0);
	}
}
