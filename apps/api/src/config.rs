use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::quiz::fallback::DEFAULT_FALLBACK_DELAY;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Which generation path the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Gemini completion service.
    Live,
    /// Offline template generator.
    Fallback,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(BackendKind::Live),
            "fallback" => Ok(BackendKind::Fallback),
            other => Err(anyhow!(
                "QUIZ_BACKEND must be 'live' or 'fallback', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// The Gemini key is optional: a missing key only shows up as a rejected request.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub backend: BackendKind,
    pub fallback_delay: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            backend: optional_env("QUIZ_BACKEND")
                .as_deref()
                .unwrap_or("live")
                .parse()?,
            fallback_delay: Duration::from_millis(
                std::env::var("FALLBACK_DELAY_MS")
                    .unwrap_or_else(|_| DEFAULT_FALLBACK_DELAY.as_millis().to_string())
                    .parse::<u64>()
                    .context("FALLBACK_DELAY_MS must be a whole number of milliseconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
