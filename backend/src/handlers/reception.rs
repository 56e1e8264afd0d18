//! Saved reception HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{CreateReceptionPayload, Reception, UpdateReceptionPayload};

use crate::error::AppResult;
use crate::AppState;

pub async fn list_receptions(State(state): State<AppState>) -> AppResult<Json<Vec<Reception>>> {
    let receptions = state.api.receptions().list_all().await?;
    Ok(Json(receptions))
}

pub async fn get_reception(
    State(state): State<AppState>,
    Path(reception_id): Path<i64>,
) -> AppResult<Json<Reception>> {
    let reception = state.api.receptions().get_by_id(reception_id).await?;
    Ok(Json(reception))
}

/// Create a reception from a ready-made payload
///
/// Forms normally go through the draft endpoints instead.
pub async fn create_reception(
    State(state): State<AppState>,
    Json(input): Json<CreateReceptionPayload>,
) -> AppResult<(StatusCode, Json<Reception>)> {
    let reception = state.api.receptions().create(&input).await?;
    Ok((StatusCode::CREATED, Json(reception)))
}

/// Update guide, plate or status of a saved reception
pub async fn update_reception(
    State(state): State<AppState>,
    Path(reception_id): Path<i64>,
    Json(input): Json<UpdateReceptionPayload>,
) -> AppResult<Json<Reception>> {
    let reception = state.api.receptions().update(reception_id, &input).await?;
    Ok(Json(reception))
}

pub async fn delete_reception(
    State(state): State<AppState>,
    Path(reception_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.api.receptions().delete(reception_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
