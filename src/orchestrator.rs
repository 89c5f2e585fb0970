//! Turn orchestration
//!
//! One call to [`Orchestrator::run_turn`] is one conversational turn:
//! guardrails, user message, model call, disclaimer, assistant message.
//! The model call can fail but the turn cannot; a failure becomes the
//! assistant's reply.

use std::str::FromStr;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    conversation::{Message, Session},
    disclaimer::ensure_disclaimer,
    error::{AppError, AppResult},
    guardrails::{self, Advisory},
    llm::ModelError,
};

/// Stored when the model answered without any text
pub const NO_RESPONSE_FALLBACK: &str = "Maaf, aku belum bisa menghasilkan respons.";

/// Prefix of the reply stored when the model call fails
pub const ERROR_PREFIX: &str = "Terjadi kesalahan: ";

/// Render the substitute reply for a failed model call
pub fn failure_reply(error: &ModelError) -> String {
    match error {
        ModelError::EmptyResponse => NO_RESPONSE_FALLBACK.to_string(),
        other => format!("{}{}", ERROR_PREFIX, other),
    }
}

/// What happens to questions that match no topic keyword
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffTopicPolicy {
    /// Show the notice and still ask the model
    #[default]
    Continue,
    /// Show the notice and answer with it instead of asking the model
    Stop,
}

#[derive(Debug, Error)]
#[error("unknown off-topic policy '{0}' (expected 'continue' or 'stop')")]
pub struct UnknownPolicy(String);

impl FromStr for OffTopicPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(OffTopicPolicy::Continue),
            "stop" => Ok(OffTopicPolicy::Stop),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// How the assistant reply of a turn was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// The model answered
    Model,
    /// The model call failed; the reply is the substitute text
    Failed(String),
    /// The model was not asked (off-topic under the stop policy)
    Skipped,
}

/// Result of one turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub advisories: Vec<Advisory>,
    pub user_message: Message,
    pub assistant_message: Message,
    pub source: ReplySource,
}

impl TurnOutcome {
    pub fn model_invoked(&self) -> bool {
        !matches!(self.source, ReplySource::Skipped)
    }

    pub fn failed(&self) -> bool {
        matches!(self.source, ReplySource::Failed(_))
    }

    /// Label for logs and metrics
    pub fn outcome_label(&self) -> &'static str {
        match self.source {
            ReplySource::Model => "answered",
            ReplySource::Failed(_) => "failed",
            ReplySource::Skipped => "skipped",
        }
    }
}

/// Runs turns against a session
#[derive(Debug, Clone, Copy, Default)]
pub struct Orchestrator {
    policy: OffTopicPolicy,
}

impl Orchestrator {
    pub fn new(policy: OffTopicPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OffTopicPolicy {
        self.policy
    }

    /// Process one user message to completion
    ///
    /// Preconditions are checked before anything is stored: the text must
    /// not be blank and the session must hold a model client. Past that
    /// point exactly one user and one assistant message are appended.
    /// Both are appended together after the model call, so a turn dropped
    /// while awaiting the model leaves the store as it was.
    #[instrument(skip(self, session, input), fields(session_id = %session.id()))]
    pub async fn run_turn(&self, session: &mut Session, input: &str) -> AppResult<TurnOutcome> {
        if input.trim().is_empty() {
            return Err(AppError::BadRequest("Message must not be empty".to_string()));
        }
        let client = session.client().ok_or(AppError::MissingApiKey)?;

        let advisories = guardrails::evaluate(input);
        for advisory in &advisories {
            warn!(advisory = advisory.as_str(), "Guardrail advisory raised");
        }
        let off_topic = advisories.contains(&Advisory::OffTopic);

        let user_message = Message::user(input);

        let (reply, source) = if off_topic && self.policy == OffTopicPolicy::Stop {
            info!("Off-topic question, model call skipped");
            (Advisory::OffTopic.message().to_string(), ReplySource::Skipped)
        } else {
            let mut history = session.store().all().to_vec();
            history.push(user_message.clone());
            match client.invoke(&history).await {
                Ok(text) => (text, ReplySource::Model),
                Err(e) => {
                    warn!(provider = client.name(), error = %e, "Model call failed, substituting reply");
                    let reply = failure_reply(&e);
                    (reply, ReplySource::Failed(e.to_string()))
                }
            }
        };

        let assistant_message = Message::assistant(ensure_disclaimer(&reply));
        let store = session.store_mut();
        store.append(user_message.clone());
        store.append(assistant_message.clone());

        Ok(TurnOutcome {
            advisories,
            user_message,
            assistant_message,
            source,
        })
    }
}
