//! HTTP routes for TanyaKakGem
//!
//! This module defines the chat page and the JSON API behind it.

pub mod chat;
pub mod health;
pub mod metrics;
pub mod ui;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/sessions", post(chat::create_session))
        .route("/api/sessions/:session_id", delete(chat::end_session))
        .route(
            "/api/sessions/:session_id/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        .route("/api/sessions/:session_id/reset", post(chat::reset_session));

    // Page, health checks and metrics
    let public_routes = Router::new()
        .route("/", get(ui::index))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (applied to all routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
