use anyhow::{Context, Result};

/// Default model when `INFERENCE_MODEL` is not set.
pub const DEFAULT_INFERENCE_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_INFERENCE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_INFERENCE_TEMPERATURE: f32 = 0.2;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent or blank disables the AI path (`skipped: missing_api_key`).
    pub anthropic_api_key: Option<String>,
    pub inference_model: String,
    pub inference_api_url: String,
    pub inference_temperature: f32,
    pub run_migrations: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            inference_model: optional_env("INFERENCE_MODEL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_MODEL.to_string()),
            inference_api_url: optional_env("INFERENCE_API_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_API_URL.to_string()),
            inference_temperature: match optional_env("INFERENCE_TEMPERATURE") {
                Some(raw) => raw
                    .parse::<f32>()
                    .context("INFERENCE_TEMPERATURE must be a number")?,
                None => DEFAULT_INFERENCE_TEMPERATURE,
            },
            run_migrations: match optional_env("RUN_MIGRATIONS") {
                Some(raw) => raw
                    .parse::<bool>()
                    .context("RUN_MIGRATIONS must be true or false")?,
                None => true,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and whitespace-only values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
