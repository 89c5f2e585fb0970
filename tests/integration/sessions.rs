//! Session lifecycle integration tests
//!
//! Creation, explicit reset, credential changes, missing and malformed
//! credentials, and ending a session.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use tanyakakgem::error::MISSING_API_KEY_MESSAGE;

use crate::common::{
    constants::{ENV_API_KEY, OTHER_API_KEY, TEST_API_KEY},
    ChatTestHarness,
};

#[tokio::test]
async fn test_create_session_starts_empty() {
    let harness = ChatTestHarness::new().await;

    let response = harness.server.post("/api/sessions").await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(!body["session_id"].as_str().unwrap().is_empty());
    assert_eq!(body["messages"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let harness = ChatTestHarness::new().await;
    harness.gemini.mock_reply("jawaban").await;
    let first = harness.create_session().await;
    let second = harness.create_session().await;

    harness.send(&first, "Apa itu PCOS?", Some(TEST_API_KEY)).await;

    assert_eq!(harness.transcript(&first).await.len(), 2);
    assert!(harness.transcript(&second).await.is_empty());
}

#[tokio::test]
async fn test_changed_credential_clears_history_before_turn() {
    let harness = ChatTestHarness::new().await;
    harness.gemini.mock_reply_for_key(TEST_API_KEY, "jawaban A").await;
    harness.gemini.mock_reply_for_key(OTHER_API_KEY, "jawaban B").await;
    let session_id = harness.create_session().await;

    harness.send(&session_id, "Apa itu PCOS?", Some(TEST_API_KEY)).await;
    let response = harness
        .send(&session_id, "Apa itu metformin?", Some(OTHER_API_KEY))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["conversation_reset"], true);
    assert!(body["assistant_message"]["content"]
        .as_str()
        .unwrap()
        .starts_with("jawaban B"));

    // Only the new turn remains, and the model never saw the old one
    let transcript = harness.transcript(&session_id).await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0]["content"], "Apa itu metformin?");
    let bodies = harness.gemini.request_bodies().await;
    assert_eq!(bodies[1]["contents"].as_array().unwrap().len(), 1);
    assert_eq!(
        harness.gemini.request_keys().await,
        vec![TEST_API_KEY.to_string(), OTHER_API_KEY.to_string()]
    );
}

#[tokio::test]
async fn test_same_credential_keeps_history() {
    let harness = ChatTestHarness::new().await;
    harness.gemini.mock_reply("jawaban").await;
    let session_id = harness.create_session().await;

    harness.send(&session_id, "Apa itu PCOS?", Some(TEST_API_KEY)).await;
    let response = harness.send(&session_id, "Apa itu haid?", Some(TEST_API_KEY)).await;

    let body: Value = response.json();
    assert_eq!(body["conversation_reset"], false);
    assert_eq!(harness.transcript(&session_id).await.len(), 4);
}

#[tokio::test]
async fn test_missing_credential_halts_with_prompt() {
    let harness = ChatTestHarness::new().await;
    harness.gemini.expect_no_calls().await;
    let session_id = harness.create_session().await;

    let response = harness.send(&session_id, "Apa itu PCOS?", None).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "MISSING_API_KEY");
    assert_eq!(body["error"]["message"], MISSING_API_KEY_MESSAGE);
    assert!(harness.transcript(&session_id).await.is_empty());
}

#[tokio::test]
async fn test_malformed_credential_is_configuration_error() {
    let harness = ChatTestHarness::new().await;
    harness.gemini.expect_no_calls().await;
    let session_id = harness.create_session().await;

    let response = harness.send(&session_id, "Apa itu PCOS?", Some("bad\nkey")).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_API_KEY");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid API Key or configuration error"));
    assert!(harness.transcript(&session_id).await.is_empty());
}

#[tokio::test]
async fn test_environment_credential_is_used_as_fallback() {
    let harness = ChatTestHarness::with_env(&[("GOOGLE_API_KEY", ENV_API_KEY)]).await;
    harness.gemini.mock_reply_for_key(ENV_API_KEY, "jawaban").await;
    let session_id = harness.create_session().await;

    let response = harness.send(&session_id, "Apa itu PCOS?", None).await;

    response.assert_status_ok();
    assert_eq!(harness.gemini.request_keys().await, vec![ENV_API_KEY.to_string()]);
}

#[tokio::test]
async fn test_reset_clears_transcript() {
    let harness = ChatTestHarness::new().await;
    harness.gemini.mock_reply("jawaban").await;
    let session_id = harness.create_session().await;
    harness.send(&session_id, "Apa itu PCOS?", Some(TEST_API_KEY)).await;

    let response = harness
        .server
        .post(&format!("/api/sessions/{}/reset", session_id))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["messages"].as_array().unwrap().len(), 0);
    assert!(harness.transcript(&session_id).await.is_empty());

    // The next turn starts a fresh conversation with a rebuilt client
    let response = harness.send(&session_id, "Apa itu haid?", Some(TEST_API_KEY)).await;
    let body: Value = response.json();
    assert_eq!(body["conversation_reset"], false);
    let bodies = harness.gemini.request_bodies().await;
    assert_eq!(bodies[1]["contents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_end_session() {
    let harness = ChatTestHarness::new().await;
    let session_id = harness.create_session().await;
    let uri = format!("/api/sessions/{}", session_id);

    harness.server.delete(&uri).await.assert_status(StatusCode::NO_CONTENT);
    harness.server.delete(&uri).await.assert_status(StatusCode::NOT_FOUND);
    harness
        .send(&session_id, "Apa itu PCOS?", Some(TEST_API_KEY))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_returns_not_found() {
    let harness = ChatTestHarness::new().await;

    let response = harness
        .server
        .get("/api/sessions/00000000-0000-0000-0000-000000000000/messages")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
