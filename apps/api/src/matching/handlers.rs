//! Axum route handlers for the Matching API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::session::SessionId;
use crate::models::RankedResult;
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Lets clients tell "ran fine, nothing qualified" apart from a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    NoQualifyingMatches,
}

impl MatchStatus {
    fn of(matches: &[RankedResult]) -> Self {
        if matches.is_empty() {
            MatchStatus::NoQualifyingMatches
        } else {
            MatchStatus::Matched
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub status: MatchStatus,
    pub matches: Vec<RankedResult>,
}

#[derive(Debug, Serialize)]
pub struct CachedMatchResponse {
    pub status: MatchStatus,
    pub computed_at: DateTime<Utc>,
    pub matches: Vec<RankedResult>,
}

struct Upload {
    content_type: String,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matches
///
/// Multipart upload (field `file`, PDF/PNG/JPEG). Runs the full match pipeline
/// and stores the shortlist for the session.
pub async fn handle_create_match(
    State(state): State<AppState>,
    SessionId(session): SessionId,
    mut multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    info!(
        "Match requested: session={session}, type={}, size={}B",
        upload.content_type,
        upload.bytes.len()
    );

    let matches = state
        .pipeline
        .run_for_session(
            session,
            state.cache.as_ref(),
            &upload.bytes,
            &upload.content_type,
        )
        .await?;

    Ok(Json(MatchResponse {
        status: MatchStatus::of(&matches),
        matches,
    }))
}

/// GET /api/v1/matches
///
/// Returns the last shortlist computed for this session.
pub async fn handle_get_last_match(
    State(state): State<AppState>,
    SessionId(session): SessionId,
) -> Result<Json<CachedMatchResponse>, AppError> {
    let cached = state
        .cache
        .load(session)
        .await?
        .ok_or_else(|| AppError::NotFound("No match results for this session".to_string()))?;

    Ok(Json(CachedMatchResponse {
        status: MatchStatus::of(&cached.results),
        computed_at: cached.computed_at,
        matches: cached.results,
    }))
}

/// DELETE /api/v1/matches
pub async fn handle_clear_last_match(
    State(state): State<AppState>,
    SessionId(session): SessionId,
) -> Result<StatusCode, AppError> {
    state.cache.clear(session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok(Upload {
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in upload"
    )))
}
