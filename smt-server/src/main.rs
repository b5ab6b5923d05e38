mod config;
mod error;
mod routes;
mod store;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use config::ServerConfig;
use store::AppState;

/// Main entry point for the server.
///
/// Builds the model store, wraps it in shared state, and starts an Actix-web
/// HTTP server. Models are trained on first use (or at startup with
/// `--preload`) and kept for the lifetime of the process.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let config = ServerConfig::parse();
	let state = web::Data::new(AppState::new(config.clone()));

	if let Some(name) = &config.preload {
		match state.load(name) {
			Ok(translator) => info!("preloaded corpus '{}' ({} source words)", name, translator.table().len()),
			Err(e) => warn!("could not preload corpus '{}': {}", name, e),
		}
	}

	info!("serving corpora from {} on {}:{}", config.data_dir.display(), config.host, config.port);

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.wrap(Logger::default())
			.app_data(state.clone())
			.configure(routes::configure)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
