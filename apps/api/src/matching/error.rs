use thiserror::Error;

use crate::catalog::CatalogError;
use crate::llm_client::LlmError;
use crate::matching::pipeline::PipelineStage;

/// Every way a match run can fail. Each variant reaches the caller as-is.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Unsupported document type '{0}'. Upload a PDF, PNG, or JPEG file.")]
    UnsupportedDocumentType(String),

    #[error("The document analysis returned no content")]
    EmptyExtractionResponse,

    /// `response` is the raw service text, kept for logs only.
    #[error("Could not read a major and keywords from the document")]
    ExtractionParseError { response: String },

    #[error("No labs are available to match against")]
    EmptyCatalog,

    #[error("The lab catalog is unavailable")]
    CatalogUnavailable(#[source] CatalogError),

    #[error("Failed to encode the lab catalog for scoring")]
    CatalogEncoding(#[from] serde_json::Error),

    #[error("The document analysis service failed")]
    DocumentServiceError(#[source] LlmError),

    #[error("The lab scoring service failed")]
    ScoringServiceError(#[source] LlmError),

    #[error("Timed out while {0}")]
    Timeout(PipelineStage),
}

impl MatchError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::UnsupportedDocumentType(_) => "UNSUPPORTED_DOCUMENT_TYPE",
            MatchError::EmptyExtractionResponse => "EMPTY_EXTRACTION_RESPONSE",
            MatchError::ExtractionParseError { .. } => "EXTRACTION_PARSE_ERROR",
            MatchError::EmptyCatalog => "EMPTY_CATALOG",
            MatchError::CatalogUnavailable(_) => "CATALOG_UNAVAILABLE",
            MatchError::CatalogEncoding(_) => "CATALOG_ENCODING_ERROR",
            MatchError::DocumentServiceError(_) => "DOCUMENT_SERVICE_ERROR",
            MatchError::ScoringServiceError(_) => "SCORING_SERVICE_ERROR",
            MatchError::Timeout(_) => "TIMEOUT",
        }
    }

    /// Maps a service failure to this stage's error kind, keeping timeouts distinct.
    pub(crate) fn from_service(
        stage: PipelineStage,
        error: LlmError,
        wrap: fn(LlmError) -> MatchError,
    ) -> MatchError {
        match error {
            LlmError::Timeout => MatchError::Timeout(stage),
            other => wrap(other),
        }
    }
}
