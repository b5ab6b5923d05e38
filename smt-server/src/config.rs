use std::path::PathBuf;

use clap::Parser;
use smt_core::model::{DEFAULT_LOG_PROB, DecodeOptions};

/// Server configuration.
///
/// Every field can be given as a flag or through its `SMT_*` environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "smt-server")]
#[command(about = "HTTP service for word-based statistical translation", long_about = None)]
#[command(version)]
pub struct ServerConfig {
	/// Directory holding one sub-directory per corpus (source.txt + target.txt)
	#[arg(long, env = "SMT_DATA_DIR", default_value = "./data")]
	pub data_dir: PathBuf,

	/// Address to bind
	#[arg(long, env = "SMT_HOST", default_value = "127.0.0.1")]
	pub host: String,

	/// Port to bind
	#[arg(long, env = "SMT_PORT", default_value_t = 5000)]
	pub port: u16,

	/// Log-probability charged for unseen bigrams in fluency scores
	#[arg(long, env = "SMT_DEFAULT_LOG_PROB", default_value_t = DEFAULT_LOG_PROB, allow_hyphen_values = true)]
	pub default_log_prob: f64,

	/// Corpus to load at startup
	#[arg(long, env = "SMT_PRELOAD")]
	pub preload: Option<String>,
}

impl ServerConfig {
	/// Configuration with default values and the given data directory.
	#[cfg(test)]
	pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
		Self {
			data_dir: data_dir.into(),
			host: "127.0.0.1".to_owned(),
			port: 5000,
			default_log_prob: DEFAULT_LOG_PROB,
			preload: None,
		}
	}

	pub fn decode_options(&self) -> DecodeOptions {
		DecodeOptions { default_log_prob: self.default_log_prob }
	}
}
