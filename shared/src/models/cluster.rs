//! Measurement clusters of a reception form

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The five sub-fields a cluster may carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum SubFieldKind {
    Percent,
    Tolerance,
    Penalty,
    Range,
    Node,
}

impl SubFieldKind {
    pub const ALL: [SubFieldKind; 5] = [
        SubFieldKind::Percent,
        SubFieldKind::Tolerance,
        SubFieldKind::Penalty,
        SubFieldKind::Range,
        SubFieldKind::Node,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubFieldKind::Percent => "percent",
            SubFieldKind::Tolerance => "tolerance",
            SubFieldKind::Penalty => "penalty",
            SubFieldKind::Range => "range",
            SubFieldKind::Node => "node",
        }
    }
}

/// Value plus validation state of a single sub-field.
///
/// `value: None` means the figure has not been entered or computed yet,
/// which is distinct from `Some(0)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub error_message: String,
}

impl FieldState {
    pub fn with_value(value: Decimal) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Only a flag together with a non-empty message counts as an error
    pub fn is_erroring(&self) -> bool {
        self.error && !self.error_message.is_empty()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = true;
        self.error_message = message.into();
    }

    pub fn clear_error(&mut self) {
        self.error = false;
        self.error_message.clear();
    }
}

/// A named measurement group
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<FieldState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<FieldState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<FieldState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<FieldState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<FieldState>,
}

impl Cluster {
    /// Cluster holding only a measured node value
    pub fn measured(value: Option<Decimal>) -> Self {
        Self {
            node: Some(FieldState {
                value,
                ..FieldState::default()
            }),
            ..Self::default()
        }
    }

    pub fn field(&self, kind: SubFieldKind) -> Option<&FieldState> {
        match kind {
            SubFieldKind::Percent => self.percent.as_ref(),
            SubFieldKind::Tolerance => self.tolerance.as_ref(),
            SubFieldKind::Penalty => self.penalty.as_ref(),
            SubFieldKind::Range => self.range.as_ref(),
            SubFieldKind::Node => self.node.as_ref(),
        }
    }

    /// Mutable access, creating the sub-field when absent
    pub fn field_mut(&mut self, kind: SubFieldKind) -> &mut FieldState {
        let slot = match kind {
            SubFieldKind::Percent => &mut self.percent,
            SubFieldKind::Tolerance => &mut self.tolerance,
            SubFieldKind::Penalty => &mut self.penalty,
            SubFieldKind::Range => &mut self.range,
            SubFieldKind::Node => &mut self.node,
        };
        slot.get_or_insert_with(FieldState::default)
    }

    pub fn value(&self, kind: SubFieldKind) -> Option<Decimal> {
        self.field(kind).and_then(|f| f.value)
    }

    pub fn set_value(&mut self, kind: SubFieldKind, value: Option<Decimal>) {
        self.field_mut(kind).value = value;
    }

    /// True when any of the five sub-fields is erroring
    pub fn has_error(&self) -> bool {
        SubFieldKind::ALL
            .iter()
            .filter_map(|kind| self.field(*kind))
            .any(FieldState::is_erroring)
    }

    pub fn clear_errors(&mut self) {
        for slot in [
            &mut self.node,
            &mut self.percent,
            &mut self.tolerance,
            &mut self.penalty,
            &mut self.range,
        ] {
            if let Some(field) = slot.as_mut() {
                field.clear_error();
            }
        }
    }
}

/// Names of the clusters on a reception form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterName {
    #[serde(rename = "grossWeight")]
    GrossWeight,
    #[serde(rename = "tare")]
    Tare,
    #[serde(rename = "netWeight")]
    NetWeight,
    Humidity,
    GreenGrains,
    Impurities,
    Vano,
    Hualcacho,
    PeeledGrains,
    ChalkyGrains,
    StainedGrains,
    Summary,
    DiscountTotal,
    Bonus,
    #[serde(rename = "totalPaddy")]
    TotalPaddy,
}

impl ClusterName {
    /// Grain analysis parameters subject to discount, in form order
    pub const ANALYSIS: [ClusterName; 8] = [
        ClusterName::Humidity,
        ClusterName::GreenGrains,
        ClusterName::Impurities,
        ClusterName::Vano,
        ClusterName::Hualcacho,
        ClusterName::PeeledGrains,
        ClusterName::ChalkyGrains,
        ClusterName::StainedGrains,
    ];

    /// Discount code used by the discount-percent table
    pub fn discount_code(&self) -> Option<i32> {
        match self {
            ClusterName::Humidity => Some(1),
            ClusterName::GreenGrains => Some(2),
            ClusterName::Impurities => Some(3),
            ClusterName::Vano => Some(4),
            ClusterName::Hualcacho => Some(5),
            ClusterName::PeeledGrains => Some(6),
            ClusterName::ChalkyGrains => Some(7),
            ClusterName::StainedGrains => Some(8),
            _ => None,
        }
    }

    pub fn is_analysis(&self) -> bool {
        self.discount_code().is_some()
    }

    /// Label shown on forms and receipts
    pub fn label(&self) -> &'static str {
        match self {
            ClusterName::GrossWeight => "Peso Bruto",
            ClusterName::Tare => "Tara",
            ClusterName::NetWeight => "Peso Neto",
            ClusterName::Humidity => "Humedad",
            ClusterName::GreenGrains => "Granos Verdes",
            ClusterName::Impurities => "Impurezas",
            ClusterName::Vano => "Vano",
            ClusterName::Hualcacho => "Hualcacho",
            ClusterName::PeeledGrains => "Granos Pelados y Partidos",
            ClusterName::ChalkyGrains => "Granos Yesosos y Yesados",
            ClusterName::StainedGrains => "Granos Manchados y Dañados",
            ClusterName::Summary => "Total Análisis",
            ClusterName::DiscountTotal => "Total Descuentos",
            ClusterName::Bonus => "Bonificación",
            ClusterName::TotalPaddy => "Paddy Neto",
        }
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Live clusters of one reception, keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Clusters(BTreeMap<ClusterName, Cluster>);

impl Clusters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty clusters for every known name, as a fresh form shows them
    pub fn blank() -> Self {
        let mut clusters = Self::new();
        for name in [
            ClusterName::GrossWeight,
            ClusterName::Tare,
            ClusterName::NetWeight,
            ClusterName::Summary,
            ClusterName::DiscountTotal,
            ClusterName::TotalPaddy,
        ] {
            clusters.insert(name, Cluster::measured(None));
        }
        for name in ClusterName::ANALYSIS {
            clusters.insert(
                name,
                Cluster {
                    range: Some(FieldState::default()),
                    percent: Some(FieldState::default()),
                    tolerance: Some(FieldState::default()),
                    penalty: Some(FieldState::default()),
                    node: None,
                },
            );
        }
        clusters.insert(
            ClusterName::Bonus,
            Cluster {
                percent: Some(FieldState::default()),
                penalty: Some(FieldState::default()),
                ..Cluster::default()
            },
        );
        clusters
    }

    pub fn get(&self, name: ClusterName) -> Option<&Cluster> {
        self.0.get(&name)
    }

    /// Mutable access, inserting an empty cluster when absent
    pub fn entry(&mut self, name: ClusterName) -> &mut Cluster {
        self.0.entry(name).or_default()
    }

    pub fn insert(&mut self, name: ClusterName, cluster: Cluster) -> Option<Cluster> {
        self.0.insert(name, cluster)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClusterName, &Cluster)> {
        self.0.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Cluster> {
        self.0.values_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(ClusterName, Cluster)> for Clusters {
    fn from_iter<I: IntoIterator<Item = (ClusterName, Cluster)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_partial_error_state_is_not_erroring() {
        let flag_only = FieldState {
            value: None,
            error: true,
            error_message: String::new(),
        };
        assert!(!flag_only.is_erroring());

        let message_only = FieldState {
            value: None,
            error: false,
            error_message: "requerido".to_string(),
        };
        assert!(!message_only.is_erroring());
    }

    #[test]
    fn test_cluster_field_mut_creates_missing_field() {
        let mut cluster = Cluster::default();
        assert!(cluster.penalty.is_none());
        cluster.set_value(SubFieldKind::Penalty, Some(Decimal::from(15)));
        assert_eq!(cluster.value(SubFieldKind::Penalty), Some(Decimal::from(15)));
    }

    #[test]
    fn test_cluster_names_serialize_with_form_keys() {
        let json = serde_json::to_string(&ClusterName::GrossWeight).unwrap();
        assert_eq!(json, "\"grossWeight\"");
        let json = serde_json::to_string(&ClusterName::DiscountTotal).unwrap();
        assert_eq!(json, "\"DiscountTotal\"");
        let json = serde_json::to_string(&ClusterName::TotalPaddy).unwrap();
        assert_eq!(json, "\"totalPaddy\"");
    }

    #[test]
    fn test_clusters_deserialize_from_form_json() {
        let clusters: Clusters = serde_json::from_str(
            r#"{"grossWeight": {"node": {"value": 1000, "error": false, "errorMessage": ""}},
                "Bonus": {"penalty": {"value": 15}}}"#,
        )
        .unwrap();
        assert_eq!(
            clusters.get(ClusterName::GrossWeight).and_then(|c| c.value(SubFieldKind::Node)),
            Some(Decimal::from(1000))
        );
        assert_eq!(
            clusters.get(ClusterName::Bonus).and_then(|c| c.value(SubFieldKind::Penalty)),
            Some(Decimal::from(15))
        );
    }

    #[test]
    fn test_analysis_parameters_have_distinct_codes() {
        let mut codes: Vec<i32> = ClusterName::ANALYSIS
            .iter()
            .filter_map(|n| n.discount_code())
            .collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), ClusterName::ANALYSIS.len());
        assert!(ClusterName::TotalPaddy.discount_code().is_none());
    }
}
