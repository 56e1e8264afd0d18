//! Producer management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{CreateProducerDto, Producer, UpdateProducerDto};
use validator::Validate;

use crate::error::AppResult;
use crate::AppState;

/// List all producers
pub async fn list_producers(State(state): State<AppState>) -> AppResult<Json<Vec<Producer>>> {
    let producers = state.api.producers().list_all().await?;
    Ok(Json(producers))
}

/// Get a producer by ID
pub async fn get_producer(
    State(state): State<AppState>,
    Path(producer_id): Path<i64>,
) -> AppResult<Json<Producer>> {
    let producer = state.api.producers().get_by_id(producer_id).await?;
    Ok(Json(producer))
}

/// Create a producer after checking RUT and phone locally
pub async fn create_producer(
    State(state): State<AppState>,
    Json(input): Json<CreateProducerDto>,
) -> AppResult<(StatusCode, Json<Producer>)> {
    input.validate()?;
    let producer = state.api.producers().create(&input).await?;
    tracing::info!("Producer {} created ({})", producer.id, producer.rut);
    Ok((StatusCode::CREATED, Json(producer)))
}

/// Update a producer
pub async fn update_producer(
    State(state): State<AppState>,
    Path(producer_id): Path<i64>,
    Json(input): Json<UpdateProducerDto>,
) -> AppResult<Json<Producer>> {
    input.validate()?;
    let producer = state.api.producers().update(producer_id, &input).await?;
    Ok(Json(producer))
}

/// Delete a producer
pub async fn delete_producer(
    State(state): State<AppState>,
    Path(producer_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.api.producers().delete(producer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
