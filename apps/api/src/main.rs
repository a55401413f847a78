mod analysis;
mod chat;
mod config;
mod documents;
mod errors;
mod gemini;
mod matching;
mod plans;
mod routes;
mod state;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::matching::scoring::GeminiMatchScorer;
use crate::routes::build_router;
use crate::state::AppState;

/// Upload cap for document processing (PDFs).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Learnix API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the Gemini client. A missing key degrades AI features to
    // immediate per-call errors rather than stopping the service.
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set. AI features will not work.");
    }
    let gemini = GeminiClient::new(config.gemini_api_key.clone());
    info!("Gemini client initialized (model: {})", gemini::DEFAULT_MODEL);

    // Initialize the compatibility scorer over the shared client.
    let matcher = Arc::new(GeminiMatchScorer::new(gemini.clone()));

    // Build app state
    let state = AppState { gemini, matcher };

    // Build router
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
