use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values; the LLM key is optional and its
/// absence puts the service in template-only mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub llm_enabled: bool,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let google_api_key = optional_env("GOOGLE_API_KEY");
        let llm_enabled = parse_bool(
            "ENABLE_LLM",
            &std::env::var("ENABLE_LLM").unwrap_or_else(|_| "true".to_string()),
        )?;

        let max_sessions = std::env::var("MAX_SESSIONS")
            .unwrap_or_else(|_| "500".to_string())
            .parse::<usize>()
            .context("MAX_SESSIONS must be a whole number")?;
        anyhow::ensure!(max_sessions > 0, "MAX_SESSIONS must be at least 1");

        Ok(Config {
            google_api_key,
            llm_enabled,
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number")?
                * 1024
                * 1024,
            max_sessions,
        })
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// The key to use for LLM calls, or `None` when calls are disabled.
    pub fn active_api_key(&self) -> Option<&str> {
        self.google_api_key
            .as_deref()
            .filter(|_| self.llm_enabled)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be true or false, got '{other}'"),
    }
}
