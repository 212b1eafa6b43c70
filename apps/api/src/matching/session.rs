use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

pub const SESSION_HEADER: &str = "x-session-id";

/// Client session that scopes the cached shortlist, read from `x-session-id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| AppError::Validation(format!("{SESSION_HEADER} header is required")))?
            .to_str()
            .map_err(|_| AppError::Validation(format!("{SESSION_HEADER} must be ASCII")))?;

        Uuid::parse_str(raw.trim())
            .map(SessionId)
            .map_err(|_| AppError::Validation(format!("{SESSION_HEADER} must be a UUID")))
    }
}
