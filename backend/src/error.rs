//! Error handling for the Paddy Reception Platform
//!
//! Every failure reaches the client as `{error: true, code, message}` so
//! forms can render it inline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{ErrorPayload, ReceptionError, NETWORK_ERROR_MESSAGE};
use thiserror::Error;

use crate::external::RemoteError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Reception draft errors
    #[error("Reception error: {0}")]
    Reception(#[from] ReceptionError),

    // External service errors
    #[error("Remote API error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: true,
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let first = errors
            .field_errors()
            .into_iter()
            .find_map(|(field, errs)| errs.first().map(|e| (field.to_string(), e.clone())));

        match first {
            Some((field, err)) => AppError::Validation {
                message: err
                    .message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Valor inválido para {}", field)),
                field,
            },
            None => AppError::Validation {
                field: String::new(),
                message: "Datos inválidos".to_string(),
            },
        }
    }
}

impl From<AppError> for ErrorPayload {
    fn from(err: AppError) -> Self {
        ErrorPayload::new(err.detail().1.message)
    }
}

impl AppError {
    fn detail(&self) -> (StatusCode, ErrorResponse) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    field: Some(field.clone()),
                    ..ErrorResponse::new("VALIDATION_ERROR", message.clone())
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", format!("No se encontró {}", resource)),
            ),
            AppError::Reception(err) => match err {
                ReceptionError::ReadOnlyField { cluster, field } => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        field: Some(format!("{:?}.{}", cluster, field)),
                        ..ErrorResponse::new(
                            "READ_ONLY_FIELD",
                            format!("El campo {} de {} es calculado", field, cluster),
                        )
                    },
                ),
                ReceptionError::HasValidationErrors => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new(
                        "RECEPTION_INVALID",
                        "La recepción tiene errores de validación",
                    ),
                ),
                ReceptionError::MissingData(what) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        field: Some(what.to_string()),
                        ..ErrorResponse::new(
                            "RECEPTION_INCOMPLETE",
                            format!("Falta información obligatoria: {}", what),
                        )
                    },
                ),
            },
            AppError::Remote(err) => match err {
                RemoteError::Rejected { status, message } => (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    ErrorResponse::new("REMOTE_REJECTED", message.clone()),
                ),
                RemoteError::Network(_) => (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new("REMOTE_UNAVAILABLE", NETWORK_ERROR_MESSAGE),
                ),
                RemoteError::Cancelled => (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("REQUEST_CANCELLED", err.to_string()),
                ),
            },
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("CONFIGURATION_ERROR", format!("Error de configuración: {}", msg)),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("INTERNAL_ERROR", msg.clone()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
