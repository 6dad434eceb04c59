use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_AI_MODEL: &str = "gpt-4";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Only malformed numeric values are fatal; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the AI parsing service. `None` disables the AI stage.
    pub ai_backend_url: Option<String>,
    pub ai_model: String,
    pub ai_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ai_timeout_secs = match std::env::var("AI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_AI_TIMEOUT_SECS,
        };

        Ok(Config {
            ai_backend_url: optional_env("AI_BACKEND_URL"),
            ai_model: optional_env("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            ai_timeout: Duration::from_secs(ai_timeout_secs),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
