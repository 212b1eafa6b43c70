//! Plain-text extraction from base64-encoded PDFs.

pub mod handlers;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No file provided")]
    Missing,

    #[error("Invalid base64 string: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Failed to parse PDF: {0}")]
    Unreadable(String),
}

/// Decodes a base64 payload. A `data:<mime>;base64,` prefix is stripped first.
pub fn decode_base64_document(encoded: &str) -> Result<Vec<u8>, DocumentError> {
    let encoded = encoded.trim();
    let payload = match encoded.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => encoded,
    };
    if payload.is_empty() {
        return Err(DocumentError::Missing);
    }
    Ok(BASE64.decode(payload)?)
}

/// Concatenated text of every page. CPU-bound; call from a blocking task.
pub fn extract_pdf_text(pdf: &[u8]) -> Result<String, DocumentError> {
    pdf_extract::extract_text_from_mem(pdf)
        .map(|text| text.trim().to_string())
        .map_err(|e| DocumentError::Unreadable(e.to_string()))
}
