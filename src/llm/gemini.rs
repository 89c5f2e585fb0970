//! Google Gemini `generateContent` client
//!
//! Converts the conversation into Gemini's wire format: system messages
//! become `systemInstruction`, user turns keep role `user` and assistant
//! turns are sent as role `model`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::provider::{ChatModel, ModelError, ModelFactory, ModelSettings};
use crate::{
    conversation::{Message, Role},
    error::{AppError, AppResult},
};

const API_KEY_HEADER: &str = "x-goog-api-key";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
}

fn text_content(role: Option<&str>, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Gemini client bound to one API key
pub struct GeminiClient {
    client: reqwest::Client,
    settings: ModelSettings,
    headers: HeaderMap,
}

impl GeminiClient {
    /// Create a new client; rejects keys that cannot be sent as a header
    pub fn new(client: reqwest::Client, settings: ModelSettings, api_key: &str) -> AppResult<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::InvalidApiKey(
                "API key must not be empty".to_string(),
            ));
        }

        let mut key_value = HeaderValue::from_str(api_key).map_err(|_| {
            AppError::InvalidApiKey("API key contains invalid characters".to_string())
        })?;
        key_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            settings,
            headers,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }

    fn build_request(&self, messages: &[Message]) -> GenerateContentRequest {
        let mut contents = Vec::new();
        let mut system_parts = Vec::new();

        for message in messages {
            match message.role() {
                Role::System => system_parts.push(message.content()),
                Role::User => contents.push(text_content(Some("user"), message.content())),
                Role::Assistant => contents.push(text_content(Some("model"), message.content())),
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(text_content(None, &system_parts.join("\n\n")))
        };

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        }
    }
}

/// Pull the reply text out of a decoded response
fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| {
            if let Some(reason) = candidate.finish_reason.as_deref() {
                debug!(finish_reason = %reason, "Gemini candidate finished");
            }
            candidate.content
        })
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match response.prompt_feedback.and_then(|f| f.block_reason) {
        Some(reason) => Err(ModelError::Blocked(reason)),
        None => Err(ModelError::EmptyResponse),
    }
}

/// Turn a non-2xx body into a readable message, preferring Google's own text
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<GoogleErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, messages), fields(model = %self.settings.model, messages = messages.len()))]
    async fn invoke(&self, messages: &[Message]) -> Result<String, ModelError> {
        let url = self.endpoint();
        let request = self.build_request(messages);

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to Gemini");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini returned an error status");
            return Err(ModelError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let decoded: GenerateContentResponse = response.json().await?;
        debug!(candidates = decoded.candidates.len(), "Received response from Gemini");
        extract_text(decoded)
    }
}

/// Builds a [`GeminiClient`] per credential, sharing one connection pool
pub struct GeminiFactory {
    client: reqwest::Client,
    settings: ModelSettings,
}

impl GeminiFactory {
    pub fn new(client: reqwest::Client, settings: ModelSettings) -> Self {
        Self { client, settings }
    }
}

impl ModelFactory for GeminiFactory {
    fn build(&self, api_key: &str) -> AppResult<Arc<dyn ChatModel>> {
        let client = GeminiClient::new(self.client.clone(), self.settings.clone(), api_key)?;
        Ok(Arc::new(client))
    }
}
