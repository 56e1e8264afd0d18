//! Discount templates

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cluster::ClusterName;

/// Per-parameter settings of a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSetting {
    #[serde(default = "default_true")]
    pub available: bool,
    /// Tolerance subtracted from the looked-up percent
    #[serde(default)]
    pub tolerance: Decimal,
    #[serde(default)]
    pub show_tolerance: bool,
}

impl Default for ParameterSetting {
    fn default() -> Self {
        Self {
            available: true,
            tolerance: Decimal::ZERO,
            show_tolerance: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Bonus settings of a template
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BonusSetting {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub percent: Decimal,
}

/// A named, reusable set of discount rules
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTemplate {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub producer_id: Option<i64>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub parameters: BTreeMap<ClusterName, ParameterSetting>,
    #[serde(default)]
    pub bonus: BonusSetting,
}

impl DiscountTemplate {
    /// Settings for an analysis parameter; parameters the template does
    /// not mention use the defaults.
    pub fn parameter(&self, name: ClusterName) -> ParameterSetting {
        self.parameters.get(&name).cloned().unwrap_or_default()
    }
}

/// Payload for creating or replacing a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_id: Option<i64>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub parameters: BTreeMap<ClusterName, ParameterSetting>,
    #[serde(default)]
    pub bonus: BonusSetting,
}

impl From<&DiscountTemplate> for SaveTemplateDto {
    fn from(template: &DiscountTemplate) -> Self {
        Self {
            name: template.name.clone(),
            producer_id: template.producer_id,
            is_default: template.is_default,
            parameters: template.parameters.clone(),
            bonus: template.bonus.clone(),
        }
    }
}
