//! Reception models: the in-progress draft and the persisted record

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::cluster::{ClusterName, Clusters, SubFieldKind};
use super::discount::DiscountPercent;
use super::producer::Producer;
use super::template::DiscountTemplate;

/// Errors raised while editing or saving a reception draft
#[derive(Debug, Error, PartialEq)]
pub enum ReceptionError {
    #[error("Field {field} of {cluster} is computed and cannot be edited")]
    ReadOnlyField {
        cluster: ClusterName,
        field: &'static str,
    },

    #[error("Reception has validation errors")]
    HasValidationErrors,

    #[error("Missing required data: {0}")]
    MissingData(&'static str),
}

/// Descriptive fields of a reception
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneralData {
    pub producer_id: Option<i64>,
    pub producer_name: String,
    pub producer_rut: String,
    pub producer_business_name: String,
    pub producer_address: String,
    pub guide: String,
    pub license_plate: String,
}

/// Partial update of the descriptive fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneralDataPatch {
    pub guide: Option<String>,
    pub license_plate: Option<String>,
}

/// An in-progress reception, alive from form open until save or discard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionData {
    pub id: Uuid,
    #[serde(flatten)]
    pub general: GeneralData,
    pub template: DiscountTemplate,
    #[serde(default)]
    pub discount_ranges: Vec<DiscountPercent>,
    pub clusters: Clusters,
    pub opened_at: DateTime<Utc>,
}

/// A single mutation of a reception draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReceptionUpdate {
    /// Select the producer delivering the paddy
    SetProducer { producer: Producer },
    /// Edit guide number or license plate
    SetGeneral { patch: GeneralDataPatch },
    /// Enter a raw measurement
    SetField {
        cluster: ClusterName,
        field: SubFieldKind,
        value: Option<Decimal>,
    },
    /// Switch to another template with its discount table
    SetTemplate {
        template: DiscountTemplate,
        #[serde(default)]
        ranges: Vec<DiscountPercent>,
    },
    /// Clear every measurement, keeping producer and template
    ClearMeasurements,
}

impl ReceptionData {
    pub fn new(template: DiscountTemplate) -> Self {
        Self {
            id: Uuid::new_v4(),
            general: GeneralData::default(),
            template,
            discount_ranges: Vec::new(),
            clusters: Clusters::blank(),
            opened_at: Utc::now(),
        }
    }

    /// Apply one mutation and recompute derived figures
    pub fn apply(&mut self, update: ReceptionUpdate) -> Result<(), ReceptionError> {
        match update {
            ReceptionUpdate::SetProducer { producer } => {
                self.general.producer_id = Some(producer.id);
                self.general.producer_name = producer.name;
                self.general.producer_rut = producer.rut;
                self.general.producer_business_name = producer.business_name;
                self.general.producer_address = producer.address;
            }
            ReceptionUpdate::SetGeneral { patch } => {
                if let Some(guide) = patch.guide {
                    self.general.guide = guide;
                }
                if let Some(plate) = patch.license_plate {
                    self.general.license_plate = plate;
                }
            }
            ReceptionUpdate::SetField {
                cluster,
                field,
                value,
            } => {
                if !is_editable(cluster, field) {
                    return Err(ReceptionError::ReadOnlyField {
                        cluster,
                        field: field.as_str(),
                    });
                }
                self.clusters.entry(cluster).set_value(field, value);
            }
            ReceptionUpdate::SetTemplate { template, ranges } => {
                // Tolerances follow the new template
                for name in ClusterName::ANALYSIS {
                    self.clusters
                        .entry(name)
                        .set_value(SubFieldKind::Tolerance, None);
                }
                self.template = template;
                self.discount_ranges = ranges;
            }
            ReceptionUpdate::ClearMeasurements => {
                self.clusters = Clusters::blank();
            }
        }

        crate::calculation::recalculate(
            &mut self.clusters,
            &self.template,
            &self.discount_ranges,
        );
        Ok(())
    }

    pub fn has_validation_errors(&self) -> bool {
        crate::aggregation::has_validation_errors(&self.clusters)
    }

    /// Build the payload sent to the backend on save
    pub fn to_payload(&self) -> Result<CreateReceptionPayload, ReceptionError> {
        if self.has_validation_errors() {
            return Err(ReceptionError::HasValidationErrors);
        }
        let producer_id = self
            .general
            .producer_id
            .ok_or(ReceptionError::MissingData("producer"))?;
        let node = |name: ClusterName| {
            self.clusters
                .get(name)
                .and_then(|c| c.value(SubFieldKind::Node))
        };
        let gross_weight = node(ClusterName::GrossWeight)
            .ok_or(ReceptionError::MissingData("grossWeight"))?;
        let tare = node(ClusterName::Tare).ok_or(ReceptionError::MissingData("tare"))?;
        let net_weight = node(ClusterName::NetWeight).unwrap_or(gross_weight - tare);

        let analysis = ClusterName::ANALYSIS
            .iter()
            .filter(|name| self.template.parameter(**name).available)
            .filter_map(|name| {
                let cluster = self.clusters.get(*name)?;
                Some(AnalysisLine {
                    code: name.discount_code()?,
                    name: *name,
                    range: cluster.value(SubFieldKind::Range),
                    percent: cluster.value(SubFieldKind::Percent),
                    tolerance: cluster.value(SubFieldKind::Tolerance),
                    penalty: cluster.value(SubFieldKind::Penalty),
                })
            })
            .collect();

        Ok(CreateReceptionPayload {
            producer_id,
            template_id: self.template.id,
            guide: self.general.guide.clone(),
            license_plate: self.general.license_plate.clone(),
            gross_weight,
            tare,
            net_weight,
            analysis,
            total_discount: node(ClusterName::DiscountTotal).unwrap_or_default(),
            bonus: self
                .clusters
                .get(ClusterName::Bonus)
                .and_then(|c| c.value(SubFieldKind::Penalty))
                .unwrap_or_default(),
            paddy_net: node(ClusterName::TotalPaddy).unwrap_or(net_weight),
            status: ReceptionStatus::Pending,
        })
    }
}

/// Raw measurements the operator may type; everything else is derived
pub fn is_editable(cluster: ClusterName, field: SubFieldKind) -> bool {
    match (cluster, field) {
        (ClusterName::GrossWeight, SubFieldKind::Node) => true,
        (ClusterName::Tare, SubFieldKind::Node) => true,
        (name, SubFieldKind::Range) => name.is_analysis(),
        (name, SubFieldKind::Tolerance) => name.is_analysis(),
        _ => false,
    }
}

/// Processing status of a saved reception
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReceptionStatus {
    #[default]
    Pending,
    Settled,
    Canceled,
}

/// One analysis parameter line of a saved reception
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisLine {
    pub code: i32,
    pub name: ClusterName,
    pub range: Option<Decimal>,
    pub percent: Option<Decimal>,
    pub tolerance: Option<Decimal>,
    pub penalty: Option<Decimal>,
}

/// Payload for creating a reception
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionPayload {
    pub producer_id: i64,
    pub template_id: Option<i64>,
    pub guide: String,
    pub license_plate: String,
    pub gross_weight: Decimal,
    pub tare: Decimal,
    pub net_weight: Decimal,
    pub analysis: Vec<AnalysisLine>,
    pub total_discount: Decimal,
    pub bonus: Decimal,
    pub paddy_net: Decimal,
    pub status: ReceptionStatus,
}

/// Payload for updating a reception
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceptionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReceptionStatus>,
}

/// A reception as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: i64,
    pub producer_id: i64,
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub guide: String,
    #[serde(default)]
    pub license_plate: String,
    pub gross_weight: Decimal,
    pub tare: Decimal,
    pub net_weight: Decimal,
    #[serde(default)]
    pub analysis: Vec<AnalysisLine>,
    #[serde(default)]
    pub total_discount: Decimal,
    #[serde(default)]
    pub bonus: Decimal,
    pub paddy_net: Decimal,
    #[serde(default)]
    pub status: ReceptionStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn producer() -> Producer {
        Producer {
            id: 42,
            name: "Juan Pérez".to_string(),
            business_name: "Agrícola Pérez Ltda.".to_string(),
            rut: "12.345.678-5".to_string(),
            address: "Camino a Parral km 4".to_string(),
            phone: "+56912345678".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn draft() -> ReceptionData {
        ReceptionData::new(DiscountTemplate {
            id: Some(1),
            name: "Base".to_string(),
            ..DiscountTemplate::default()
        })
    }

    fn set(draft: &mut ReceptionData, cluster: ClusterName, field: SubFieldKind, value: &str) {
        draft
            .apply(ReceptionUpdate::SetField {
                cluster,
                field,
                value: Some(dec(value)),
            })
            .unwrap();
    }

    #[test]
    fn test_new_draft_has_blank_clusters() {
        let draft = draft();
        assert!(!draft.has_validation_errors());
        assert_eq!(
            draft
                .clusters
                .get(ClusterName::GrossWeight)
                .and_then(|c| c.value(SubFieldKind::Node)),
            None
        );
    }

    #[test]
    fn test_computed_fields_are_read_only() {
        let mut draft = draft();
        let result = draft.apply(ReceptionUpdate::SetField {
            cluster: ClusterName::NetWeight,
            field: SubFieldKind::Node,
            value: Some(dec("10")),
        });
        assert_eq!(
            result,
            Err(ReceptionError::ReadOnlyField {
                cluster: ClusterName::NetWeight,
                field: "node",
            })
        );
    }

    #[test]
    fn test_set_producer_fills_general_data() {
        let mut draft = draft();
        draft
            .apply(ReceptionUpdate::SetProducer {
                producer: producer(),
            })
            .unwrap();
        assert_eq!(draft.general.producer_id, Some(42));
        assert_eq!(draft.general.producer_rut, "12.345.678-5");
    }

    #[test]
    fn test_payload_requires_producer() {
        let mut draft = draft();
        set(&mut draft, ClusterName::GrossWeight, SubFieldKind::Node, "1000");
        set(&mut draft, ClusterName::Tare, SubFieldKind::Node, "200");
        assert_eq!(
            draft.to_payload(),
            Err(ReceptionError::MissingData("producer"))
        );
    }

    #[test]
    fn test_payload_rejects_validation_errors() {
        let mut draft = draft();
        draft
            .apply(ReceptionUpdate::SetProducer {
                producer: producer(),
            })
            .unwrap();
        set(&mut draft, ClusterName::GrossWeight, SubFieldKind::Node, "100");
        set(&mut draft, ClusterName::Tare, SubFieldKind::Node, "200");
        assert!(draft.has_validation_errors());
        assert_eq!(draft.to_payload(), Err(ReceptionError::HasValidationErrors));
    }

    #[test]
    fn test_payload_carries_weights() {
        let mut draft = draft();
        draft
            .apply(ReceptionUpdate::SetProducer {
                producer: producer(),
            })
            .unwrap();
        set(&mut draft, ClusterName::GrossWeight, SubFieldKind::Node, "1000");
        set(&mut draft, ClusterName::Tare, SubFieldKind::Node, "200");
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload.producer_id, 42);
        assert_eq!(payload.template_id, Some(1));
        assert_eq!(payload.net_weight, dec("800"));
        assert_eq!(payload.paddy_net, dec("800"));
        assert_eq!(payload.status, ReceptionStatus::Pending);
    }

    #[test]
    fn test_update_deserializes_tagged() {
        let update: ReceptionUpdate = serde_json::from_str(
            r#"{"type": "set_field", "cluster": "grossWeight", "field": "node", "value": 1200}"#,
        )
        .unwrap();
        assert_eq!(
            update,
            ReceptionUpdate::SetField {
                cluster: ClusterName::GrossWeight,
                field: SubFieldKind::Node,
                value: Some(dec("1200")),
            }
        );
    }
}
