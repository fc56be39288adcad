//! OpenAI-style chat completion client.
//!
//! Sends the two-message prompt with fixed generation parameters to
//! `{base_url}/chat/completions` and hands back the raw JSON document so it
//! can be cached verbatim.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;

use super::config::{InferenceConfig, OpenAiSettings};
use super::errors::InferenceError;
use super::types::{ChatCompletionRequest, ConversationPrompt};

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ─── OpenAiClient ────────────────────────────────────────────────────────────

/// Client for an OpenAI-compatible chat completion endpoint.
pub struct OpenAiClient {
    http: HttpClient,
    settings: OpenAiSettings,
    api_key: String,
    request_timeout: Duration,
}

impl OpenAiClient {
    /// Create a client from the resolved configuration.
    ///
    /// Fails with `ConfigError` if `OPENAI_API_KEY` was not provided. Does NOT
    /// check connectivity.
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let api_key = config.credentials.openai_api_key()?.to_string();
        let request_timeout = Duration::from_secs(config.request_timeout_secs);

        let http = build_http_client(&config.openai.base_url, request_timeout)?;

        Ok(Self {
            http,
            settings: config.openai.clone(),
            api_key,
            request_timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    /// Send a non-streaming chat completion request.
    ///
    /// Returns the parsed JSON body on 2xx. HTTP and transport failures come
    /// back as tagged errors and are logged here.
    pub async fn complete(&self, prompt: &ConversationPrompt) -> Result<Value, InferenceError> {
        let url = self.endpoint();
        let body = ChatCompletionRequest {
            messages: prompt.messages(),
            max_tokens: self.settings.max_tokens,
            model: &self.settings.model,
            temperature: self.settings.temperature,
        };

        tracing::info!(
            url = %url,
            model = %body.model,
            message_count = body.messages.len(),
            max_tokens = body.max_tokens,
            "=== LLM REQUEST ==="
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e, self.request_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body_text, "HTTP error occurred");
            return Err(InferenceError::HttpError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        tracing::info!(status = status.as_u16(), "API call successful");

        let body_text = response
            .text()
            .await
            .map_err(|e| transport_error(&url, e, self.request_timeout))?;
        Ok(serde_json::from_str(&body_text)?)
    }
}

// ─── Shared HTTP plumbing ────────────────────────────────────────────────────

/// Build an HTTP client with the standard connect and request timeouts.
pub(crate) fn build_http_client(
    endpoint: &str,
    request_timeout: Duration,
) -> Result<HttpClient, InferenceError> {
    HttpClient::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .build()
        .map_err(|e| InferenceError::ConnectionFailed {
            endpoint: endpoint.to_string(),
            reason: format!("failed to build HTTP client: {e}"),
        })
}

/// Map a transport-level `reqwest` failure onto the error taxonomy.
pub(crate) fn transport_error(
    url: &str,
    e: reqwest::Error,
    request_timeout: Duration,
) -> InferenceError {
    let err = if e.is_timeout() {
        InferenceError::Timeout {
            duration_secs: request_timeout.as_secs(),
        }
    } else {
        InferenceError::ConnectionFailed {
            endpoint: url.to_string(),
            reason: e.to_string(),
        }
    };
    tracing::error!(error = %err, "request error occurred");
    err
}

// ─── Tests ───────────────────────────────────────────────────────────────────
