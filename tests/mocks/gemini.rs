//! Mock Gemini API for testing
//!
//! Provides wiremock-based mocks for `POST /v1beta/models/{model}:generateContent`.
//!
//! # Example
//!
//! ```rust,ignore
//! let gemini = MockGemini::start().await;
//! gemini.mock_reply("PCOS adalah ...").await;
//! // Use gemini.api_base() as GEMINI_API_URL
//! ```

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Model id the test configuration uses
pub const TEST_MODEL: &str = "gemini-2.5-flash";

/// Mock Gemini server wrapper
pub struct MockGemini {
    server: MockServer,
}

impl MockGemini {
    /// Start a new mock Gemini server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to configure as `GEMINI_API_URL`
    pub fn api_base(&self) -> String {
        format!("{}/v1beta", self.server.uri())
    }

    fn endpoint() -> String {
        format!("/v1beta/models/{}:generateContent", TEST_MODEL)
    }

    /// Successful response body carrying `text`
    pub fn reply_body(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20}
        })
    }

    // =========================================================================
    // Success
    // =========================================================================

    /// Answer every request with `text`
    pub async fn mock_reply(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .and(header_exists("x-goog-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::reply_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Answer only requests carrying `api_key`
    pub async fn mock_reply_for_key(&self, api_key: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .and(header("x-goog-api-key", api_key))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::reply_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Fail the test on drop if the endpoint is ever called
    pub async fn expect_no_calls(&self) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::reply_body("unused")))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Failures
    // =========================================================================

    /// Google-style error response
    pub async fn mock_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"code": status, "message": message, "status": "ERROR"}
            })))
            .mount(&self.server)
            .await;
    }

    /// 200 response with no candidates
    pub async fn mock_empty(&self) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&self.server)
            .await;
    }

    /// Prompt rejected by safety filters
    pub async fn mock_blocked(&self, reason: &str) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": reason}
            })))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Bodies of all requests received so far, in order
    pub async fn request_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("request body is JSON"))
            .collect()
    }

    /// `x-goog-api-key` values of all requests received so far
    pub async fn request_keys(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| {
                r.headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}
