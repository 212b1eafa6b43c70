use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::matching::cache::CacheError;
use crate::matching::MatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Match(e) => (match_status(e), e.code(), e.to_string()),
            AppError::Catalog(e) => {
                tracing::error!("Catalog error: {e:?}");
                let status = match e {
                    CatalogError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
                    CatalogError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (
                    status,
                    "CATALOG_UNAVAILABLE",
                    "The lab catalog is unavailable".to_string(),
                )
            }
            AppError::Cache(e) => {
                tracing::error!("Cache error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CACHE_ERROR",
                    "Saved results are unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

fn match_status(e: &MatchError) -> StatusCode {
    match e {
        MatchError::UnsupportedDocumentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        MatchError::ExtractionParseError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MatchError::EmptyExtractionResponse => StatusCode::BAD_GATEWAY,
        MatchError::EmptyCatalog => StatusCode::SERVICE_UNAVAILABLE,
        MatchError::CatalogUnavailable(source) => {
            tracing::error!("Catalog unavailable: {source:?}");
            StatusCode::SERVICE_UNAVAILABLE
        }
        MatchError::CatalogEncoding(source) => {
            tracing::error!("Catalog encoding failed: {source}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        MatchError::DocumentServiceError(source) | MatchError::ScoringServiceError(source) => {
            tracing::error!("LLM error: {source}");
            StatusCode::BAD_GATEWAY
        }
        MatchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
