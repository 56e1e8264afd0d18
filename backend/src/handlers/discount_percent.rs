//! Discount-percent range HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use shared::{CreateDiscountPercentDto, DiscountPercent, UpdateDiscountPercentDto};

use crate::error::{AppError, AppResult};
use crate::AppState;

fn check_bounds(start: Option<Decimal>, end: Option<Decimal>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(AppError::Validation {
                field: "end".to_string(),
                message: "El fin del rango debe ser mayor o igual al inicio".to_string(),
            });
        }
    }
    Ok(())
}

/// List every discount range
pub async fn list_discount_percents(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DiscountPercent>>> {
    let ranges = state.api.discount_percents().list_all().await?;
    Ok(Json(ranges))
}

/// List the ranges of one analysis parameter
pub async fn list_discount_percents_by_code(
    State(state): State<AppState>,
    Path(code): Path<i32>,
) -> AppResult<Json<Vec<DiscountPercent>>> {
    let ranges = state.api.discount_percents_by_code(code).await?;
    Ok(Json(ranges))
}

pub async fn get_discount_percent(
    State(state): State<AppState>,
    Path(range_id): Path<i64>,
) -> AppResult<Json<DiscountPercent>> {
    let range = state.api.discount_percents().get_by_id(range_id).await?;
    Ok(Json(range))
}

pub async fn create_discount_percent(
    State(state): State<AppState>,
    Json(input): Json<CreateDiscountPercentDto>,
) -> AppResult<(StatusCode, Json<DiscountPercent>)> {
    check_bounds(Some(input.start), Some(input.end))?;
    let range = state.api.discount_percents().create(&input).await?;
    Ok((StatusCode::CREATED, Json(range)))
}

pub async fn update_discount_percent(
    State(state): State<AppState>,
    Path(range_id): Path<i64>,
    Json(input): Json<UpdateDiscountPercentDto>,
) -> AppResult<Json<DiscountPercent>> {
    check_bounds(input.start, input.end)?;
    let range = state
        .api
        .discount_percents()
        .update(range_id, &input)
        .await?;
    Ok(Json(range))
}

pub async fn delete_discount_percent(
    State(state): State<AppState>,
    Path(range_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.api.discount_percents().delete(range_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
