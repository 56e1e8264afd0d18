//! Client for the paddy backend API
//!
//! Wraps the remote CRUD surfaces for producers, discount-percent ranges,
//! discount templates and receptions. Failures never escape as panics or
//! transport errors: every call resolves to the record or a [`RemoteError`]
//! that renders as `{error: true, message}`.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    CreateDiscountPercentDto, CreateProducerDto, CreateReceptionPayload, DiscountPercent,
    DiscountTemplate, ErrorPayload, Producer, Reception, SaveTemplateDto,
    UpdateDiscountPercentDto, UpdateProducerDto, UpdateReceptionPayload, NETWORK_ERROR_MESSAGE,
};
use thiserror::Error;

use crate::error::{AppError, AppResult};

/// Failure of a remote call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The backend answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Connection, timeout or body decoding failure; the detail is for logs only
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(String),

    /// A newer request superseded this one
    #[error("Solicitud cancelada")]
    Cancelled,
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<RemoteError> for ErrorPayload {
    fn from(err: RemoteError) -> Self {
        ErrorPayload::new(err.to_string())
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Network(format!("request timed out: {}", err))
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}

/// A CRUD surface of the backend API
pub trait RemoteResource {
    /// Collection path, e.g. `/producers`
    const PATH: &'static str;
    /// Spanish noun used in default error messages
    const NOUN: &'static str;

    type Record: DeserializeOwned;
    type Create: Serialize + Sync;
    type Update: Serialize + Sync;
}

pub struct Producers;
pub struct DiscountPercents;
pub struct Templates;
pub struct Receptions;

impl RemoteResource for Producers {
    const PATH: &'static str = "/producers";
    const NOUN: &'static str = "productor";
    type Record = Producer;
    type Create = CreateProducerDto;
    type Update = UpdateProducerDto;
}

impl RemoteResource for DiscountPercents {
    const PATH: &'static str = "/discounts-percent";
    const NOUN: &'static str = "rango";
    type Record = DiscountPercent;
    type Create = CreateDiscountPercentDto;
    type Update = UpdateDiscountPercentDto;
}

impl RemoteResource for Templates {
    const PATH: &'static str = "/templates";
    const NOUN: &'static str = "plantilla";
    type Record = DiscountTemplate;
    type Create = SaveTemplateDto;
    type Update = SaveTemplateDto;
}

impl RemoteResource for Receptions {
    const PATH: &'static str = "/receptions";
    const NOUN: &'static str = "recepción";
    type Record = Reception;
    type Create = CreateReceptionPayload;
    type Update = UpdateReceptionPayload;
}

/// Paddy backend API client
#[derive(Clone)]
pub struct PaddyApiClient {
    client: Client,
    base_url: String,
}

impl PaddyApiClient {
    /// Create a client whose requests give up after `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn producers(&self) -> ResourceApi<'_, Producers> {
        ResourceApi::new(self)
    }

    pub fn discount_percents(&self) -> ResourceApi<'_, DiscountPercents> {
        ResourceApi::new(self)
    }

    pub fn templates(&self) -> ResourceApi<'_, Templates> {
        ResourceApi::new(self)
    }

    pub fn receptions(&self) -> ResourceApi<'_, Receptions> {
        ResourceApi::new(self)
    }

    /// Ranges of one discount code
    pub async fn discount_percents_by_code(&self, code: i32) -> Result<Vec<DiscountPercent>, RemoteError> {
        let path = format!("{}/code/{}", DiscountPercents::PATH, code);
        self.execute(self.request(Method::GET, &path), "Error al obtener rangos")
            .await
    }

    /// The template flagged as default
    pub async fn default_template(&self) -> Result<DiscountTemplate, RemoteError> {
        let path = format!("{}/default", Templates::PATH);
        self.execute(
            self.request(Method::GET, &path),
            "No se encontró la plantilla por defecto",
        )
        .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send and decode a JSON body
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        default_message: &str,
    ) -> Result<T, RemoteError> {
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(rejection(response, default_message).await);
        }
        response.json::<T>().await.map_err(|e| {
            tracing::warn!("Failed to parse backend response: {}", e);
            RemoteError::Network(e.to_string())
        })
    }

    /// Send a request whose success body is ignored
    async fn execute_empty(
        &self,
        request: RequestBuilder,
        default_message: &str,
    ) -> Result<(), RemoteError> {
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(rejection(response, default_message).await);
        }
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        request.send().await.map_err(|e| {
            tracing::warn!("Backend request failed: {}", e);
            RemoteError::from(e)
        })
    }
}

/// Turn a non-success response into a rejection.
///
/// The backend's `message` wins (string or list of strings); an error body
/// that is not JSON at all counts as a server failure.
async fn rejection(response: Response, default_message: &str) -> RemoteError {
    let status = response.status().as_u16();
    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Backend returned {} with unreadable body: {}", status, e);
            return RemoteError::Network(e.to_string());
        }
    };

    let message = match body.get("message") {
        Some(Value::String(m)) if !m.is_empty() => m.clone(),
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => default_message.to_string(),
    };

    tracing::warn!("Backend rejected request with {}: {}", status, message);
    RemoteError::Rejected { status, message }
}

/// CRUD calls for one resource kind
pub struct ResourceApi<'a, R> {
    api: &'a PaddyApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: RemoteResource> ResourceApi<'a, R> {
    fn new(api: &'a PaddyApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    pub async fn list_all(&self) -> Result<Vec<R::Record>, RemoteError> {
        tracing::debug!("GET {}", R::PATH);
        self.api
            .execute(
                self.api.request(Method::GET, R::PATH),
                &format!("Error al obtener {}", R::NOUN),
            )
            .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<R::Record, RemoteError> {
        let path = Self::item_path(id);
        tracing::debug!("GET {}", path);
        self.api
            .execute(
                self.api.request(Method::GET, &path),
                &format!("Error al obtener {}", R::NOUN),
            )
            .await
    }

    pub async fn create(&self, payload: &R::Create) -> Result<R::Record, RemoteError> {
        tracing::debug!("POST {}", R::PATH);
        self.api
            .execute(
                self.api.request(Method::POST, R::PATH).json(payload),
                &format!("Error al crear {}", R::NOUN),
            )
            .await
    }

    pub async fn update(&self, id: i64, payload: &R::Update) -> Result<R::Record, RemoteError> {
        let path = Self::item_path(id);
        tracing::debug!("PUT {}", path);
        self.api
            .execute(
                self.api.request(Method::PUT, &path).json(payload),
                &format!("Error al actualizar {}", R::NOUN),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        let path = Self::item_path(id);
        tracing::debug!("DELETE {}", path);
        self.api
            .execute_empty(
                self.api.request(Method::DELETE, &path),
                &format!("Error al eliminar {}", R::NOUN),
            )
            .await
    }
}
