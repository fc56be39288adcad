//! Hugging Face inference endpoint client.
//!
//! Hosted text-generation endpoints take a single `inputs` string, so the
//! conversation is flattened to `Prompt: …\nSystem: …` before sending.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;

use super::client::{build_http_client, transport_error};
use super::config::InferenceConfig;
use super::errors::InferenceError;
use super::types::{ConversationPrompt, TextGenerationRequest};

/// Client for a deployed Hugging Face inference endpoint.
pub struct HuggingFaceClient {
    http: HttpClient,
    endpoint_url: String,
    token: String,
    request_timeout: Duration,
}

impl HuggingFaceClient {
    /// Create a client from the resolved configuration.
    ///
    /// A missing `HUGGINGFACEHUB_API_TOKEN` is a `ConfigError`. An empty
    /// endpoint URL is accepted here and rejected per call as `InvalidInput`.
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let token = config.credentials.huggingface_token()?.to_string();
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let endpoint_url = config.huggingface.endpoint_url.clone();
        let http = build_http_client(&endpoint_url, request_timeout)?;

        Ok(Self {
            http,
            endpoint_url,
            token,
            request_timeout,
        })
    }

    /// Build the request for `prompt` and send it.
    pub async fn complete(&self, prompt: &ConversationPrompt) -> Result<Value, InferenceError> {
        let payload = serde_json::to_value(TextGenerationRequest::from_prompt(prompt))?;
        tracing::info!(inputs = %payload["inputs"], "running inference with prompt");
        self.query(&payload).await
    }

    /// POST a raw JSON payload to the endpoint.
    ///
    /// Fails fast with `InvalidInput` when the payload, endpoint URL, or token
    /// is empty.
    pub async fn query(&self, payload: &Value) -> Result<Value, InferenceError> {
        if is_empty_payload(payload) || self.endpoint_url.trim().is_empty() || self.token.is_empty()
        {
            return Err(InferenceError::InvalidInput {
                reason: "payload, API URL, and token must be provided".into(),
            });
        }

        let url = self.endpoint_url.as_str();
        let response = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| transport_error(url, e, self.request_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body_text, "HTTP error occurred");
            return Err(InferenceError::HttpError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| transport_error(url, e, self.request_timeout))?;
        Ok(serde_json::from_str(&body_text)?)
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
