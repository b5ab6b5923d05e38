use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use smt_core::SmtError;
use thiserror::Error;

/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
	#[error(transparent)]
	Smt(#[from] SmtError),

	#[error("{0}")]
	BadRequest(String),

	#[error("No corpus loaded, use PUT /v1/load_corpus first")]
	NoCorpus,

	#[error("Model lock failed")]
	Lock,

	#[error("Background task failed")]
	Blocking,
}

impl ResponseError for ApiError {
	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::Smt(SmtError::Input(_)) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::Smt(SmtError::Io { err, .. }) if err.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
			ApiError::NoCorpus => StatusCode::CONFLICT,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code()).body(self.to_string())
	}
}
