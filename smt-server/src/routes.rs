use std::sync::Arc;

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use smt_core::corpus::list_corpora;
use smt_core::evaluation::{BleuResult, compute_bleu};
use smt_core::model::{Translation, Translator};
use smt_core::preprocess::prepare;

use crate::error::ApiError;
use crate::store::AppState;

/// Query parameters for the `/v1/translate` endpoint
#[derive(Deserialize)]
struct TranslateParams {
	text: Option<String>,
	reference: Option<String>,
	corpus: Option<String>,
}

/// Query parameters for the `/v1/bleu` endpoint
#[derive(Deserialize)]
struct BleuParams {
	candidate: Option<String>,
	reference: Option<String>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	name: Option<String>,
}

#[derive(Serialize)]
struct TranslateResponse {
	corpus: String,
	#[serde(flatten)]
	translation: Translation,
	#[serde(skip_serializing_if = "Option::is_none")]
	bleu: Option<BleuResult>,
}

#[derive(Serialize)]
struct LoadResponse {
	corpus: String,
	source_words: usize,
	bigrams: usize,
}

fn required(value: &Option<String>, name: &str) -> Result<String, ApiError> {
	match value {
		Some(s) if !s.trim().is_empty() => Ok(s.clone()),
		_ => Err(ApiError::BadRequest(format!("Missing or empty parameter '{}'", name))),
	}
}

/// Resolves `name` on a blocking thread; training can take a while.
///
/// Only `activate` requests change the corpus used by later requests without `corpus=`.
async fn resolve_corpus(data: &web::Data<AppState>, name: String, activate: bool) -> Result<Arc<Translator>, ApiError> {
	let state = data.clone();
	web::block(move || if activate { state.load(&name) } else { state.get_or_train(&name) })
		.await
		.map_err(|_| ApiError::Blocking)?
}

/// HTTP GET endpoint `/v1/translate`
///
/// Translates `text` with the requested corpus (or the active one) and adds a
/// BLEU evaluation when `reference` is given.
#[get("/v1/translate")]
async fn get_translate(data: web::Data<AppState>, query: web::Query<TranslateParams>) -> Result<HttpResponse, ApiError> {
	let text = required(&query.text, "text")?;

	let (corpus, translator) = match &query.corpus {
		Some(name) if !name.trim().is_empty() => {
			let name = name.trim().to_owned();
			let translator = resolve_corpus(&data, name.clone(), false).await?;
			(name, translator)
		}
		_ => data.active()?.ok_or(ApiError::NoCorpus)?,
	};

	let options = data.config.decode_options();
	let response = match query.reference.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
		Some(reference) => {
			let evaluation = translator.evaluate(&text, reference, &options);
			TranslateResponse { corpus, translation: evaluation.translation, bleu: Some(evaluation.bleu) }
		}
		None => TranslateResponse { corpus, translation: translator.translate(&text, &options), bleu: None },
	};

	Ok(HttpResponse::Ok().json(response))
}

/// HTTP GET endpoint `/v1/bleu`
///
/// Scores a candidate against a reference; both are cleaned and tokenized first.
#[get("/v1/bleu")]
async fn get_bleu(query: web::Query<BleuParams>) -> Result<HttpResponse, ApiError> {
	let candidate = prepare(&required(&query.candidate, "candidate")?);
	let reference = prepare(&required(&query.reference, "reference")?);
	Ok(HttpResponse::Ok().json(compute_bleu(&candidate, &reference)))
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(list_corpora(&data.config.data_dir)?))
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(data.loaded_names()?))
}

#[put("/v1/load_corpus")]
async fn put_corpus(data: web::Data<AppState>, query: web::Query<CorpusQuery>) -> Result<HttpResponse, ApiError> {
	let name = required(&query.name, "name")?.trim().to_owned();
	let translator = resolve_corpus(&data, name.clone(), true).await?;

	Ok(HttpResponse::Ok().json(LoadResponse {
		corpus: name,
		source_words: translator.table().len(),
		bigrams: translator.language_model().len(),
	}))
}

/// Registers every endpoint on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_translate)
		.service(get_bleu)
		.service(get_corpora)
		.service(get_loaded_corpora)
		.service(put_corpus);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ServerConfig;
	use actix_web::http::StatusCode;
	use actix_web::{App, test};
	use serde_json::Value;
	use smt_core::corpus::{SOURCE_FILE, TARGET_FILE};
	use std::fs;

	fn data_dir() -> tempfile::TempDir {
		let dir = tempfile::tempdir().unwrap();
		let corpus = dir.path().join("en-hi");
		fs::create_dir(&corpus).unwrap();
		fs::write(corpus.join(SOURCE_FILE), "Hello world.\nHello friend.\n").unwrap();
		fs::write(corpus.join(TARGET_FILE), "namaste duniya\nnamaste dost\n").unwrap();
		dir
	}

	fn state(dir: &tempfile::TempDir) -> web::Data<AppState> {
		web::Data::new(AppState::new(ServerConfig::with_data_dir(dir.path())))
	}

	#[actix_web::test]
	async fn translate_requires_a_loaded_corpus() {
		let dir = data_dir();
		let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/translate?text=hello").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::CONFLICT);
	}

	#[actix_web::test]
	async fn load_then_translate_with_reference() {
		let dir = data_dir();
		let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

		let req = test::TestRequest::put().uri("/v1/load_corpus?name=en-hi").to_request();
		let loaded: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(loaded["corpus"], "en-hi");
		assert_eq!(loaded["source_words"], 3);

		let req = test::TestRequest::get()
			.uri("/v1/translate?text=Hello%20Mars&reference=namaste%20mars")
			.to_request();
		let body: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["corpus"], "en-hi");
		assert_eq!(body["text"], "namaste mars");
		assert_eq!(body["oov"], serde_json::json!([1]));
		assert_eq!(body["bleu"]["brevity_penalty"], 1.0);
		assert_eq!(body["bleu"]["precisions"][0], 1.0);

		let req = test::TestRequest::get().uri("/v1/loaded_corpora").to_request();
		let names: Vec<String> = test::call_and_read_body_json(&app, req).await;
		assert_eq!(names, vec!["en-hi".to_owned()]);
	}

	#[actix_web::test]
	async fn translate_with_explicit_corpus() {
		let dir = data_dir();
		let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/translate?corpus=en-hi&text=friend").to_request();
		let body: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["tokens"], serde_json::json!(["dost"]));
		assert!(body.get("bleu").is_none());
	}

	#[actix_web::test]
	async fn explicit_corpus_does_not_change_active_one() {
		let dir = data_dir();
		let other = dir.path().join("en-xx");
		fs::create_dir(&other).unwrap();
		fs::write(other.join(SOURCE_FILE), "x\n").unwrap();
		fs::write(other.join(TARGET_FILE), "beta\n").unwrap();
		let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

		let req = test::TestRequest::put().uri("/v1/load_corpus?name=en-hi").to_request();
		assert!(test::call_service(&app, req).await.status().is_success());

		let req = test::TestRequest::get().uri("/v1/translate?corpus=en-xx&text=x").to_request();
		let body: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["text"], "beta");

		let req = test::TestRequest::get().uri("/v1/translate?text=x").to_request();
		let body: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["corpus"], "en-hi");
		assert_eq!(body["text"], "x");
	}

	#[actix_web::test]
	async fn bad_requests_are_rejected() {
		let dir = data_dir();
		let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/translate?text=%20").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::put().uri("/v1/load_corpus?name=..%2Fetc").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::put().uri("/v1/load_corpus?name=missing").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
	}

	#[actix_web::test]
	async fn corpora_and_bleu_endpoints() {
		let dir = data_dir();
		let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/corpora").to_request();
		let names: Vec<String> = test::call_and_read_body_json(&app, req).await;
		assert_eq!(names, vec!["en-hi".to_owned()]);

		let req = test::TestRequest::get()
			.uri("/v1/bleu?candidate=the%20cat%20is%20on%20the%20mat&reference=the%20cat%20sat%20on%20the%20mat")
			.to_request();
		let body: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["bleu"], 0.0);
		assert_eq!(body["brevity_penalty"], 1.0);
	}
}
