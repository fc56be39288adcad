//! Response text extraction.
//!
//! Pulls the generated text out of a provider's raw JSON document. The
//! documents are walked as `serde_json::Value` rather than deserialized into
//! structs, because the same value is what gets cached.

use serde_json::Value;

use super::errors::InferenceError;

/// Extract `choices[0].message.content` from a chat-completion response.
pub fn extract_chat_content(response: &Value) -> Result<String, InferenceError> {
    let choices = response
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing 'choices' array"))?;

    let first = choices.first().ok_or_else(|| malformed("empty 'choices' array"))?;

    let content = first
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing 'choices[0].message.content'"))?;

    tracing::info!(chars = content.len(), "message content extracted from API response");
    Ok(content.to_string())
}

/// Extract `[0].generated_text` from a text-generation response.
pub fn extract_generated_text(response: &Value) -> Result<String, InferenceError> {
    let text = response
        .as_array()
        .and_then(|items| items.first())
        .and_then(|item| item.get("generated_text"))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing '[0].generated_text'"))?;

    tracing::info!(chars = text.len(), "generated text extracted from API response");
    Ok(text.to_string())
}

fn malformed(reason: &str) -> InferenceError {
    tracing::error!(reason, "failed to extract message content");
    InferenceError::MalformedResponse {
        reason: reason.to_string(),
    }
}
