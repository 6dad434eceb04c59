use std::sync::Arc;

use crate::ai_client::ResumeAiBackend;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote parsing stage. `DisabledBackend` when no AI URL is configured.
    pub ai_backend: Arc<dyn ResumeAiBackend>,
    pub config: Config,
}
