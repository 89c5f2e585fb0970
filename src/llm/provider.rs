//! Model client abstraction
//!
//! Defines the boundary between the conversation logic and whatever hosted
//! model answers the questions, so tests and alternative backends can be
//! plugged in without touching the orchestrator.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{config::Config, conversation::Message, error::AppResult};

/// Failure of a single model call
///
/// These never reach the HTTP layer as errors; the orchestrator turns them
/// into a substitute assistant message.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Response blocked by the model: {0}")]
    Blocked(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Sampling and endpoint settings shared by every client a factory builds
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl ModelSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.gemini_api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// A hosted chat model bound to one credential
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Send the full ordered message list and return the reply text
    async fn invoke(&self, messages: &[Message]) -> Result<String, ModelError>;
}

/// Builds model clients from a credential
///
/// Construction is where malformed credentials are rejected; the error is a
/// configuration error that halts the session until a new key is supplied.
pub trait ModelFactory: Send + Sync {
    fn build(&self, api_key: &str) -> AppResult<Arc<dyn ChatModel>>;
}
