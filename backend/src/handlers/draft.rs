//! Reception draft HTTP handlers
//!
//! The draft is keyed by the operator behind the session, so two operators
//! can fill in receptions at the same time.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shared::{Reception, ReceptionUpdate};

use crate::error::AppResult;
use crate::middleware::Operator;
use crate::services::reception_draft::{DraftView, ReceiptView};
use crate::AppState;

/// Which template to load; the default template when absent
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTemplateInput {
    pub template_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// Current draft with totals and validation summary
pub async fn get_draft(State(state): State<AppState>, operator: Operator) -> Json<DraftView> {
    Json(state.drafts.current(operator.key()).await)
}

/// Apply a single update to the draft
pub async fn update_draft(
    State(state): State<AppState>,
    operator: Operator,
    Json(update): Json<ReceptionUpdate>,
) -> AppResult<Json<DraftView>> {
    let view = state.drafts.apply(operator.key(), update).await?;
    Ok(Json(view))
}

/// Load a template into the draft
pub async fn load_draft_template(
    State(state): State<AppState>,
    operator: Operator,
    input: Option<Json<LoadTemplateInput>>,
) -> AppResult<Json<DraftView>> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let view = state
        .drafts
        .load_template(operator.key(), input.template_id)
        .await?;
    Ok(Json(view))
}

/// Cancel a template load still in flight
pub async fn cancel_draft_template(
    State(state): State<AppState>,
    operator: Operator,
) -> Json<CancelResponse> {
    let cancelled = state.drafts.cancel_template_load(operator.key()).await;
    Json(CancelResponse { cancelled })
}

/// Persist the draft as a reception
pub async fn save_draft(
    State(state): State<AppState>,
    operator: Operator,
) -> AppResult<(StatusCode, Json<Reception>)> {
    let reception = state.drafts.save(operator.key()).await?;
    Ok((StatusCode::CREATED, Json(reception)))
}

pub async fn discard_draft(State(state): State<AppState>, operator: Operator) -> StatusCode {
    state.drafts.discard(operator.key()).await;
    StatusCode::NO_CONTENT
}

/// Printable receipt of the draft
pub async fn get_draft_receipt(
    State(state): State<AppState>,
    operator: Operator,
) -> AppResult<Json<ReceiptView>> {
    let receipt = state.drafts.receipt(operator.key()).await?;
    Ok(Json(receipt))
}
