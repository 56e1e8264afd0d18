//! Reception aggregator: display values and validation summary
//!
//! All functions are pure reads over the live clusters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Cluster, ClusterName, Clusters, SubFieldKind};

/// Format a weight as `"<value> kg"`; unset weights render as `"0 kg"`
pub fn display_kg(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{} kg", v.normalize()),
        None => "0 kg".to_string(),
    }
}

/// Display value of a cluster's node
pub fn compute_display_value(cluster: &Cluster) -> String {
    display_kg(cluster.value(SubFieldKind::Node))
}

/// Display value of the bonus cluster, which reports through its penalty
pub fn compute_bonus_display(cluster: &Cluster) -> String {
    display_kg(cluster.value(SubFieldKind::Penalty))
}

/// True when any cluster has a sub-field flagged with a non-empty message
pub fn has_validation_errors(clusters: &Clusters) -> bool {
    clusters.iter().any(|(_, cluster)| cluster.has_error())
}

/// Truthiness of a loosely typed flag: `true`, a non-zero number or a
/// non-empty string. Objects and arrays are truthy as well.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Same rule as [`has_validation_errors`] over loosely shaped JSON.
///
/// Non-object values are skipped; sub-fields whose `error` is not truthy
/// or whose `errorMessage` is not a non-empty string do not count.
pub fn has_validation_errors_json(clusters: &Map<String, Value>) -> bool {
    clusters
        .values()
        .filter_map(Value::as_object)
        .any(|cluster| {
            SubFieldKind::ALL.iter().any(|kind| {
                cluster
                    .get(kind.as_str())
                    .and_then(Value::as_object)
                    .is_some_and(|field| {
                        let flagged = field.get("error").is_some_and(is_truthy);
                        let message = field
                            .get("errorMessage")
                            .and_then(Value::as_str)
                            .is_some_and(|m| !m.is_empty());
                        flagged && message
                    })
            })
        })
}

/// One entry of the error summary panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub cluster: ClusterName,
    pub field: SubFieldKind,
    pub label: String,
    pub message: String,
}

/// Every erroring sub-field, in cluster then sub-field order
pub fn validation_errors(clusters: &Clusters) -> Vec<ValidationIssue> {
    clusters
        .iter()
        .flat_map(|(name, cluster)| {
            SubFieldKind::ALL.iter().filter_map(move |kind| {
                cluster
                    .field(*kind)
                    .filter(|f| f.is_erroring())
                    .map(|f| ValidationIssue {
                        cluster: *name,
                        field: *kind,
                        label: name.label().to_string(),
                        message: f.error_message.clone(),
                    })
            })
        })
        .collect()
}

/// Display-ready totals panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionTotals {
    pub gross_weight: String,
    pub tare: String,
    pub net_weight: String,
    pub discount_total: String,
    pub bonus: String,
    pub total_paddy: String,
}

impl ReceptionTotals {
    pub fn from_clusters(clusters: &Clusters) -> Self {
        let node = |name: ClusterName| {
            clusters
                .get(name)
                .map(compute_display_value)
                .unwrap_or_else(|| display_kg(None))
        };
        Self {
            gross_weight: node(ClusterName::GrossWeight),
            tare: node(ClusterName::Tare),
            net_weight: node(ClusterName::NetWeight),
            discount_total: node(ClusterName::DiscountTotal),
            bonus: clusters
                .get(ClusterName::Bonus)
                .map(compute_bonus_display)
                .unwrap_or_else(|| display_kg(None)),
            total_paddy: node(ClusterName::TotalPaddy),
        }
    }

    /// Label/value pairs in panel order
    pub fn lines(&self) -> [(&'static str, &str); 6] {
        [
            (ClusterName::GrossWeight.label(), &self.gross_weight),
            (ClusterName::Tare.label(), &self.tare),
            (ClusterName::NetWeight.label(), &self.net_weight),
            (ClusterName::DiscountTotal.label(), &self.discount_total),
            (ClusterName::Bonus.label(), &self.bonus),
            (ClusterName::TotalPaddy.label(), &self.total_paddy),
        ]
    }
}
