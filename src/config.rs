//! Configuration management for TanyaKakGem
//!
//! Configuration is loaded from environment variables (optionally seeded
//! from a `.env` file by `main`).

use anyhow::{Context, Result};
use std::env;

use crate::orchestrator::OffTopicPolicy;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Gemini API base URL (up to and including the API version)
    pub gemini_api_url: String,
    /// Fallback Google AI API key, used when a request carries none
    pub google_api_key: Option<String>,
    /// Model identifier sent to Gemini
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens per reply
    pub max_output_tokens: u32,
    /// Timeout for a single model call (in seconds)
    pub request_timeout_seconds: u64,

    /// What to do with questions that match no topic keyword
    pub off_topic_policy: OffTopicPolicy,
    /// Idle time after which a session is evicted (in seconds, 0 = never)
    pub session_ttl_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: var("KAKGEM_HOST", "0.0.0.0"),
            port: var("KAKGEM_PORT", "8080")
                .parse()
                .context("Invalid KAKGEM_PORT")?,

            gemini_api_url: var(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            )
            .trim_end_matches('/')
            .to_string(),
            google_api_key: lookup("GOOGLE_API_KEY").filter(|key| !key.trim().is_empty()),
            model: var("GEMINI_MODEL", "gemini-2.5-flash"),
            temperature: var("GEMINI_TEMPERATURE", "0.3")
                .parse()
                .context("Invalid GEMINI_TEMPERATURE")?,
            max_output_tokens: var("GEMINI_MAX_OUTPUT_TOKENS", "1024")
                .parse()
                .context("Invalid GEMINI_MAX_OUTPUT_TOKENS")?,
            request_timeout_seconds: var("GEMINI_TIMEOUT_SECONDS", "120")
                .parse()
                .context("Invalid GEMINI_TIMEOUT_SECONDS")?,

            off_topic_policy: var("KAKGEM_OFF_TOPIC_POLICY", "continue")
                .parse()
                .context("Invalid KAKGEM_OFF_TOPIC_POLICY")?,
            session_ttl_seconds: var("KAKGEM_SESSION_TTL_SECONDS", "3600")
                .parse()
                .context("Invalid KAKGEM_SESSION_TTL_SECONDS")?,
        })
    }
}
