//! Chat session endpoints
//!
//! JSON API used by the chat page: create a session, run a turn, read the
//! transcript, reset, and end the session.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    conversation::Message,
    error::{AppError, AppResult},
    guardrails::Advisory,
    routes::metrics::{record_advisory, record_session_event, record_turn},
    AppState,
};

/// Body of a new user message
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    /// Credential from the page's key field; falls back to `GOOGLE_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Advisory as shown on the page
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryNotice {
    pub kind: Advisory,
    pub message: String,
}

impl From<Advisory> for AdvisoryNotice {
    fn from(advisory: Advisory) -> Self {
        Self {
            kind: advisory,
            message: advisory.message().to_string(),
        }
    }
}

/// Result of one turn
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: String,
    pub advisories: Vec<AdvisoryNotice>,
    pub user_message: Message,
    pub assistant_message: Message,
    pub model_invoked: bool,
    pub failed: bool,
    /// True when a new credential cleared the earlier history
    pub conversation_reset: bool,
}

/// Visible transcript of a session
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
}

/// Pick the request credential, else the configured one
fn resolve_api_key(state: &AppState, supplied: Option<String>) -> AppResult<String> {
    supplied
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .or_else(|| state.config.google_api_key.clone())
        .ok_or(AppError::MissingApiKey)
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<TranscriptResponse>) {
    let session_id = state.sessions.create().await;
    record_session_event("created");
    info!(session_id = %session_id, "Session started");

    (
        StatusCode::CREATED,
        Json(TranscriptResponse {
            session_id,
            messages: Vec::new(),
        }),
    )
}

/// GET /api/sessions/:session_id/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<TranscriptResponse>> {
    let session = state.sessions.get(&session_id).await?;
    let session = session.lock().await;

    Ok(Json(TranscriptResponse {
        session_id,
        messages: session.store().transcript(),
    }))
}

/// POST /api/sessions/:session_id/messages
///
/// Halts with 401 when no usable credential is available; every other
/// path ends with one user and one assistant message stored.
#[instrument(skip_all, fields(session_id = %session_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> AppResult<Json<TurnResponse>> {
    let start_time = Instant::now();

    if request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty".to_string()));
    }

    let session = state.sessions.get(&session_id).await?;
    let api_key = resolve_api_key(&state, request.api_key)?;

    // Held for the whole turn: one turn at a time per session
    let mut session = session.lock().await;

    let sync = session.sync_credential(&api_key, state.model_factory.as_ref())?;
    if sync.cleared_history() {
        record_session_event("credential_rotated");
    }

    let outcome = state
        .orchestrator
        .run_turn(&mut session, &request.content)
        .await?;

    for advisory in &outcome.advisories {
        record_advisory(advisory.as_str());
    }
    record_turn(outcome.outcome_label(), start_time.elapsed().as_secs_f64());

    info!(
        outcome = outcome.outcome_label(),
        advisories = outcome.advisories.len(),
        history = session.store().len(),
        "Turn completed"
    );

    Ok(Json(TurnResponse {
        session_id,
        model_invoked: outcome.model_invoked(),
        failed: outcome.failed(),
        conversation_reset: sync.cleared_history(),
        advisories: outcome.advisories.into_iter().map(AdvisoryNotice::from).collect(),
        user_message: outcome.user_message,
        assistant_message: outcome.assistant_message,
    }))
}

/// POST /api/sessions/:session_id/reset
pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<TranscriptResponse>> {
    let session = state.sessions.get(&session_id).await?;
    let mut session = session.lock().await;
    session.reset();
    record_session_event("reset");

    Ok(Json(TranscriptResponse {
        session_id,
        messages: session.store().transcript(),
    }))
}

/// DELETE /api/sessions/:session_id
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<StatusCode> {
    if state.sessions.remove(&session_id).await {
        record_session_event("ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {}", session_id)))
    }
}
