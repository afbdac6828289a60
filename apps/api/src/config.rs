use anyhow::{Context, Result};

use crate::llm_client::OPENROUTER_API_URL;

const DEFAULT_APP_TITLE: &str = "ATS Analyzer";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if the inference credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub inference_api_url: String,
    /// Sent as `HTTP-Referer` so the inference provider can attribute traffic.
    pub app_referer: String,
    /// Sent as `X-Title`.
    pub app_title: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            inference_api_url: std::env::var("INFERENCE_API_URL")
                .unwrap_or_else(|_| OPENROUTER_API_URL.to_string()),
            app_referer: std::env::var("APP_REFERER")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            app_title: std::env::var("APP_TITLE").unwrap_or_else(|_| DEFAULT_APP_TITLE.to_string()),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
impl Config {
    /// Configuration for router and client tests; never reads the environment.
    pub fn for_tests() -> Self {
        Config {
            openrouter_api_key: "test-key".to_string(),
            inference_api_url: OPENROUTER_API_URL.to_string(),
            app_referer: "http://localhost:8080".to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}
