//! Discount template HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{DiscountTemplate, SaveTemplateDto};

use crate::error::{AppError, AppResult};
use crate::AppState;

fn check_name(input: &SaveTemplateDto) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "El nombre de la plantilla es obligatorio".to_string(),
        });
    }
    Ok(())
}

pub async fn list_templates(State(state): State<AppState>) -> AppResult<Json<Vec<DiscountTemplate>>> {
    let templates = state.api.templates().list_all().await?;
    Ok(Json(templates))
}

/// The template new receptions start from
pub async fn get_default_template(
    State(state): State<AppState>,
) -> AppResult<Json<DiscountTemplate>> {
    let template = state.api.default_template().await?;
    Ok(Json(template))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<i64>,
) -> AppResult<Json<DiscountTemplate>> {
    let template = state.api.templates().get_by_id(template_id).await?;
    Ok(Json(template))
}

pub async fn create_template(
    State(state): State<AppState>,
    Json(input): Json<SaveTemplateDto>,
) -> AppResult<(StatusCode, Json<DiscountTemplate>)> {
    check_name(&input)?;
    let template = state.api.templates().create(&input).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<i64>,
    Json(input): Json<SaveTemplateDto>,
) -> AppResult<Json<DiscountTemplate>> {
    check_name(&input)?;
    let template = state.api.templates().update(template_id, &input).await?;
    Ok(Json(template))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.api.templates().delete(template_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
