//! Attribute Extractor — sends the uploaded document to the document-understanding
//! service and reads an `ExtractedProfile` out of its answer.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::{info, warn};

use crate::llm_client::{Attachment, AttachmentKind, LlmClient, LlmError};
use crate::matching::error::MatchError;
use crate::matching::parser::parse_profile;
use crate::matching::pipeline::PipelineStage;
use crate::matching::prompts::{EXTRACTION_MAX_TOKENS, EXTRACTION_PROMPT, EXTRACTION_SYSTEM};
use crate::models::ExtractedProfile;

/// Upload formats the document-understanding service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentKind {
    /// Accepts full mime types (parameters ignored) and bare extensions.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" | "pdf" => Some(DocumentKind::Pdf),
            "image/png" | "png" => Some(DocumentKind::Png),
            "image/jpeg" | "image/jpg" | "jpeg" | "jpg" => Some(DocumentKind::Jpeg),
            _ => None,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Png => "image/png",
            DocumentKind::Jpeg => "image/jpeg",
        }
    }

    fn attachment_kind(self) -> AttachmentKind {
        match self {
            DocumentKind::Pdf => AttachmentKind::Document,
            DocumentKind::Png | DocumentKind::Jpeg => AttachmentKind::Image,
        }
    }
}

/// The document-understanding collaborator. Returns whatever text the service
/// produced, or `None` when it produced none.
#[async_trait]
pub trait DocumentUnderstanding: Send + Sync {
    async fn describe(
        &self,
        kind: DocumentKind,
        document_base64: &str,
    ) -> Result<Option<String>, LlmError>;
}

#[async_trait]
impl DocumentUnderstanding for LlmClient {
    async fn describe(
        &self,
        kind: DocumentKind,
        document_base64: &str,
    ) -> Result<Option<String>, LlmError> {
        let attachment = Attachment {
            kind: kind.attachment_kind(),
            media_type: kind.media_type(),
            base64_data: document_base64,
        };
        let response = self
            .call_with_attachment(
                EXTRACTION_PROMPT,
                &attachment,
                EXTRACTION_SYSTEM,
                EXTRACTION_MAX_TOKENS,
            )
            .await?;
        Ok(response.text().map(str::to_owned))
    }
}

pub struct AttributeExtractor {
    service: Arc<dyn DocumentUnderstanding>,
}

impl AttributeExtractor {
    pub fn new(service: Arc<dyn DocumentUnderstanding>) -> Self {
        Self { service }
    }

    pub async fn extract(
        &self,
        document: &[u8],
        mime_type: &str,
    ) -> Result<ExtractedProfile, MatchError> {
        let kind = DocumentKind::from_mime(mime_type)
            .ok_or_else(|| MatchError::UnsupportedDocumentType(mime_type.to_string()))?;
        if document.is_empty() {
            return Err(MatchError::UnsupportedDocumentType(format!(
                "{} (empty file)",
                kind.media_type()
            )));
        }

        let encoded = BASE64.encode(document);
        let text = self
            .service
            .describe(kind, &encoded)
            .await
            .map_err(|e| {
                MatchError::from_service(
                    PipelineStage::Extracting,
                    e,
                    MatchError::DocumentServiceError,
                )
            })?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(MatchError::EmptyExtractionResponse)?;

        match parse_profile(&text) {
            Some(profile) => {
                info!(
                    "Extracted profile: major={}, keywords={}",
                    profile.major, profile.keywords
                );
                Ok(profile)
            }
            None => {
                warn!("Extraction response had no Major/Keywords lines: {text:?}");
                Err(MatchError::ExtractionParseError { response: text })
            }
        }
    }
}
