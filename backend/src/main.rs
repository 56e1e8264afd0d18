//! Paddy Reception Platform - Backend Server
//!
//! Serves the reception workflow for paddy intake: producers, discount
//! templates and ranges, and the operator's reception draft.

use std::net::SocketAddr;

use paddy_backend::{config::DEVELOPMENT_SECRET, create_app, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paddy_server=debug,paddy_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Paddy Reception Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Backend API: {}", config.remote.base_url);
    tracing::info!("Auth policy: {:?}", config.auth.policy);

    if config.environment != "development" && config.auth.secret == DEVELOPMENT_SECRET {
        tracing::warn!("Session secret is the development default; set PADDY__AUTH__SECRET");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(config)?;

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
