//! Rice producer models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A paddy producer as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    pub id: i64,
    pub name: String,
    pub business_name: String,
    pub rut: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a producer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProducerDto {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub name: String,
    #[validate(length(min = 1, message = "La razón social es obligatoria"))]
    pub business_name: String,
    #[validate(custom = "crate::validation::validate_rut_field")]
    pub rut: String,
    #[validate(length(min = 1, message = "La dirección es obligatoria"))]
    pub address: String,
    #[validate(custom = "crate::validation::validate_phone_field")]
    pub phone: String,
}

/// Payload for updating a producer; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProducerDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "La razón social es obligatoria"))]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::validation::validate_rut_field")]
    pub rut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "La dirección es obligatoria"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::validation::validate_phone_field")]
    pub phone: Option<String>,
}
