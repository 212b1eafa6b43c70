//! Axum route handlers for the lab directory.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::LabRecord;
use crate::state::AppState;

/// GET /api/v1/labs
pub async fn handle_list_labs(
    State(state): State<AppState>,
) -> Result<Json<Vec<LabRecord>>, AppError> {
    let labs = state.catalog.fetch_all().await?;
    Ok(Json(labs))
}

/// GET /api/v1/labs/:id
pub async fn handle_get_lab(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LabRecord>, AppError> {
    let lab = state
        .catalog
        .fetch_one(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lab {id} not found")))?;
    Ok(Json(lab))
}
