//! Axum route handlers for document utilities.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::{decode_base64_document, extract_pdf_text, DocumentError};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct PdfTextRequest {
    /// Base64-encoded PDF, optionally as a data URL.
    #[serde(default)]
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct PdfTextResponse {
    pub text: String,
}

/// POST /api/v1/documents/text
pub async fn handle_pdf_text(
    Json(request): Json<PdfTextRequest>,
) -> Result<Json<PdfTextResponse>, AppError> {
    let pdf = decode_base64_document(&request.file)?;
    let text = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    info!("Extracted {} characters of PDF text", text.len());
    Ok(Json(PdfTextResponse { text }))
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::Missing | DocumentError::InvalidBase64(_) => {
                AppError::Validation(e.to_string())
            }
            DocumentError::Unreadable(_) => AppError::UnprocessableEntity(e.to_string()),
        }
    }
}
