mod ai_client;
mod config;
mod errors;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::{AiParseClient, DisabledBackend, ResumeAiBackend};
use crate::config::Config;
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

    info!("Starting RecruitFlow API v{}", env!("CARGO_PKG_VERSION"));

    let ai_backend = build_ai_backend(&config)?;

    let state = AppState {
        ai_backend,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the dashboard host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The remote AI stage, or a disabled stand-in when no URL is configured.
fn build_ai_backend(config: &Config) -> Result<Arc<dyn ResumeAiBackend>> {
    match &config.ai_backend_url {
        Some(base_url) => {
            let client = AiParseClient::new(base_url, config.ai_model.clone(), config.ai_timeout)?;
            info!(
                "AI backend enabled: {} (model: {}, timeout: {:?})",
                client.endpoint(),
                config.ai_model,
                config.ai_timeout
            );
            Ok(Arc::new(client))
        }
        None => {
            warn!("AI_BACKEND_URL not set; all resumes will be parsed by local heuristics");
            Ok(Arc::new(DisabledBackend))
        }
    }
}
