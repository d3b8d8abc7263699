mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resume;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, LanguageModel};
use crate::resume::catalog::TechCatalog;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting prep API v{}", env!("CARGO_PKG_VERSION"));

    // Compile the technology catalog up front so a bad pattern shows at boot
    match TechCatalog::builtin() {
        Ok(_) => info!("Technology catalog compiled"),
        Err(e) => warn!("Technology catalog unusable, extraction will be degraded: {e}"),
    }

    // Initialize LLM client (absent key or ENABLE_LLM=false → template-only mode)
    let llm: Option<Arc<dyn LanguageModel>> = match config.active_api_key() {
        Some(key) => {
            let client = GeminiClient::new(key.to_string(), config.llm_timeout_secs)
                .context("Failed to build LLM HTTP client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            let client: Arc<dyn LanguageModel> = Arc::new(client);
            Some(client)
        }
        None => {
            warn!("LLM disabled; interview guides will come from templates");
            None
        }
    };

    // Build app state
    let state = AppState {
        llm,
        sessions: SessionStore::new(config.max_sessions),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
