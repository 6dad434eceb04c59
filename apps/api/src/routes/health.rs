use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and whether the AI stage is enabled.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "recruitflow-api",
        "aiBackend": {
            "enabled": state.config.ai_backend_url.is_some(),
            "model": state.config.ai_model,
        }
    }))
}
