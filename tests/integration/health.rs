//! Page, health and metrics endpoint tests

use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{constants::ENV_API_KEY, ChatTestHarness};

#[tokio::test]
async fn test_index_serves_chat_page() {
    let harness = ChatTestHarness::new().await;

    let response = harness.server.get("/").await;

    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("TanyaKakGem"));
    assert!(page.contains("Google AI API Key"));
}

#[tokio::test]
async fn test_liveness() {
    let harness = ChatTestHarness::new().await;

    let response = harness.server.get("/health/live").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_without_env_key_is_degraded() {
    let harness = ChatTestHarness::new().await;
    harness.create_session().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["stats"]["active_sessions"], 1);
    assert_eq!(body["stats"]["model"], "gemini-2.5-flash");
}

#[tokio::test]
async fn test_health_with_env_key_is_healthy() {
    let harness = ChatTestHarness::with_env(&[("GOOGLE_API_KEY", ENV_API_KEY)]).await;

    let body: Value = harness.server.get("/health").await.json();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["stats"]["env_api_key_configured"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let harness = ChatTestHarness::new().await;

    harness.server.get("/metrics").await.assert_status_ok();
}
