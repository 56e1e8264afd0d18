//! Paddy Reception Platform - Backend
//!
//! Session-gated HTTP service in front of the paddy backend API. It proxies
//! the producer, discount-range, template and reception resources and keeps
//! each operator's reception draft with its derived figures.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use crate::config::Config;

use error::AppResult;
use external::PaddyApiClient;
use services::ReceptionDraftService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: PaddyApiClient,
    pub drafts: ReceptionDraftService,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let api = PaddyApiClient::new(&config.remote.base_url, config.remote.timeout())?;
        Ok(Self {
            drafts: ReceptionDraftService::new(api.clone()),
            api,
            config: Arc::new(config),
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/paddy", routes::paddy_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
