//! WebAssembly module for the Paddy Reception Platform
//!
//! Provides client-side computation for:
//! - Weight display values of the totals panel
//! - The validation error scan gating the save button
//! - Draft recalculation previews
//! - RUT and license plate checks

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::aggregation;

fn parse<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// `"<kg> kg"` for a node value; NaN, infinities and zero render as `"0 kg"`
#[wasm_bindgen]
pub fn compute_display_value(kg: f64) -> String {
    if !kg.is_finite() {
        return aggregation::display_kg(None);
    }
    match Decimal::try_from(kg) {
        Ok(value) => aggregation::display_kg(Some(value)),
        // Beyond Decimal's range
        Err(_) => format!("{} kg", kg),
    }
}

fn bonus_display(cluster_json: &str) -> Result<String, String> {
    let cluster: Cluster = parse(cluster_json, "cluster")?;
    Ok(aggregation::compute_bonus_display(&cluster))
}

/// Display value of the bonus cluster, read from its penalty
#[wasm_bindgen]
pub fn compute_bonus_display(cluster_json: &str) -> Result<String, JsValue> {
    bonus_display(cluster_json).map_err(to_js_error)
}

fn validation_errors_present(clusters_json: &str) -> Result<bool, String> {
    let clusters: Map<String, Value> = parse(clusters_json, "clusters")?;
    Ok(aggregation::has_validation_errors_json(&clusters))
}

/// True when any sub-field is flagged with a non-empty message
#[wasm_bindgen]
pub fn has_validation_errors(clusters_json: &str) -> Result<bool, JsValue> {
    validation_errors_present(clusters_json).map_err(to_js_error)
}

fn validation_summary(clusters_json: &str) -> Result<Vec<String>, String> {
    let clusters: Clusters = parse(clusters_json, "clusters")?;
    Ok(aggregation::validation_errors(&clusters)
        .into_iter()
        .map(|issue| format!("{}: {}", issue.label, issue.message))
        .collect())
}

/// `"<label>: <message>"` lines for the error summary panel
#[wasm_bindgen]
pub fn validation_messages(clusters_json: &str) -> Result<js_sys::Array, JsValue> {
    let lines = validation_summary(clusters_json).map_err(to_js_error)?;
    Ok(lines.into_iter().map(JsValue::from).collect())
}

fn totals(clusters_json: &str) -> Result<String, String> {
    let clusters: Clusters = parse(clusters_json, "clusters")?;
    let totals = aggregation::ReceptionTotals::from_clusters(&clusters);
    serde_json::to_string(&totals).map_err(|e| e.to_string())
}

/// Totals panel values as JSON
#[wasm_bindgen]
pub fn reception_totals(clusters_json: &str) -> Result<String, JsValue> {
    totals(clusters_json).map_err(to_js_error)
}

fn preview(draft_json: &str, update_json: &str) -> Result<String, String> {
    let mut draft: ReceptionData = parse(draft_json, "draft")?;
    let update: ReceptionUpdate = parse(update_json, "update")?;
    draft.apply(update).map_err(|e| e.to_string())?;
    serde_json::to_string(&draft).map_err(|e| e.to_string())
}

/// Apply an update to a draft locally and return the recomputed draft
#[wasm_bindgen]
pub fn preview_reception_update(draft_json: &str, update_json: &str) -> Result<String, JsValue> {
    preview(draft_json, update_json).map_err(to_js_error)
}

/// Validate a Chilean RUT
#[wasm_bindgen]
pub fn is_valid_rut(rut: &str) -> bool {
    validate_rut(rut).is_ok()
}

/// Format a RUT as `12.345.678-5`; invalid input is returned unchanged
#[wasm_bindgen]
pub fn format_rut_display(rut: &str) -> String {
    format_rut(rut).unwrap_or_else(|| rut.to_string())
}

/// Validate a Chilean license plate
#[wasm_bindgen]
pub fn is_valid_license_plate(plate: &str) -> bool {
    validate_license_plate(plate).is_ok()
}
