mod config;
mod errors;
mod llm_client;
mod quiz;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{BackendKind, Config};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quizie API v{}", env!("CARGO_PKG_VERSION"));

    match config.backend {
        BackendKind::Live => {
            if config.gemini_api_key.is_none() {
                warn!("GEMINI_API_KEY is not set; live generation requests will be rejected upstream");
            }
            info!(
                "Live backend (model: {}, endpoint: {})",
                llm_client::MODEL,
                config.gemini_api_url
            );
        }
        BackendKind::Fallback => info!(
            "Fallback backend (simulated delay: {}ms)",
            config.fallback_delay.as_millis()
        ),
    }

    let state = AppState::from_config(&config);

    // The presentation layer is served from its own origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
