//! Livros Server - book records REST API

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use livros_server::{api, config::AppConfig, services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("livros_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Livros Server v{}", env!("CARGO_PKG_VERSION"));

    let repository = services::open_repository(&config.storage)
        .await
        .context("failed to open book storage")?;

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = AppState::new(config.auth, repository);
    let app = api::create_router(state);

    let addr = SocketAddr::new(host.parse().context("invalid host address")?, port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
