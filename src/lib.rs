//! TanyaKakGem - PCOS education chat service
//!
//! This library provides the core functionality for the TanyaKakGem server:
//! keyword guardrails, disclaimer enforcement, per-session conversation
//! history, and the turn orchestration that forwards questions to Gemini.

pub mod config;
pub mod conversation;
pub mod disclaimer;
pub mod error;
pub mod guardrails;
pub mod llm;
pub mod orchestrator;
pub mod routes;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::config::Config;
pub use crate::conversation::{ConversationStore, Message, Role, Session, SessionRegistry};
pub use crate::llm::{ChatModel, GeminiFactory, ModelFactory, ModelSettings};
pub use crate::orchestrator::{OffTopicPolicy, Orchestrator};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Live user sessions
    pub sessions: SessionRegistry,
    /// Builds a model client whenever a session sees a new credential
    pub model_factory: Arc<dyn ModelFactory>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    /// Create a new application state backed by Gemini
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        let model_factory: Arc<dyn ModelFactory> = Arc::new(GeminiFactory::new(
            http_client,
            ModelSettings::from_config(&config),
        ));

        Ok(Self::with_model_factory(config, model_factory))
    }

    /// Create an application state with a caller-supplied model factory
    pub fn with_model_factory(config: Config, model_factory: Arc<dyn ModelFactory>) -> Self {
        let orchestrator = Orchestrator::new(config.off_topic_policy);
        let sessions = match config.session_ttl_seconds {
            0 => SessionRegistry::new(),
            ttl => SessionRegistry::with_idle_ttl(Duration::from_secs(ttl)),
        };
        Self {
            config,
            start_time: Instant::now(),
            sessions,
            model_factory,
            orchestrator,
        }
    }
}
