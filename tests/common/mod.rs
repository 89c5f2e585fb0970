//! Common test utilities for TanyaKakGem
//!
//! Builds the real router against a mock Gemini server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use tanyakakgem::{routes, AppState, Config};

use crate::mocks::MockGemini;

/// Test configuration constants
pub mod constants {
    /// Key typed into the page by the first user
    pub const TEST_API_KEY: &str = "test-api-key-a";
    /// A different, also valid key
    pub const OTHER_API_KEY: &str = "test-api-key-b";
    /// Key configured through `GOOGLE_API_KEY`
    pub const ENV_API_KEY: &str = "test-env-api-key";
}

/// Test harness: real router, mock Gemini
pub struct ChatTestHarness {
    pub server: TestServer,
    pub gemini: MockGemini,
}

impl ChatTestHarness {
    /// Harness with default configuration
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Harness with extra environment-style overrides
    pub async fn with_env(overrides: &[(&str, &str)]) -> Self {
        let gemini = MockGemini::start().await;

        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("GEMINI_API_URL".to_string(), gemini.api_base());
        vars.insert("GEMINI_TIMEOUT_SECONDS".to_string(), "5".to_string());
        for (key, value) in overrides {
            vars.insert(key.to_string(), value.to_string());
        }

        let config = Config::from_lookup(|key| vars.get(key).cloned())
            .expect("test configuration is valid");
        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        let app = routes::create_router(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, gemini }
    }

    /// Create a session and return its id
    pub async fn create_session(&self) -> String {
        let response = self.server.post("/api/sessions").await;
        let body: Value = response.json();
        body["session_id"]
            .as_str()
            .expect("session_id in response")
            .to_string()
    }

    /// Send one message with the given key
    pub async fn send(
        &self,
        session_id: &str,
        content: &str,
        api_key: Option<&str>,
    ) -> axum_test::TestResponse {
        self.server
            .post(&format!("/api/sessions/{}/messages", session_id))
            .json(&json!({ "content": content, "api_key": api_key }))
            .await
    }

    /// Visible transcript of a session
    pub async fn transcript(&self, session_id: &str) -> Vec<Value> {
        let response = self
            .server
            .get(&format!("/api/sessions/{}/messages", session_id))
            .await;
        let body: Value = response.json();
        body["messages"].as_array().cloned().unwrap_or_default()
    }
}
