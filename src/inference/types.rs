//! Shared types for the provider clients.
//!
//! Request bodies mirror the wire formats of the two supported providers.
//! Response documents are kept as raw `serde_json::Value` so they can be
//! cached verbatim.

use serde::{Deserialize, Serialize};

// ─── Prompt Types ────────────────────────────────────────────────────────────

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// The two-message conversation sent to a provider.
///
/// Serializes as a plain JSON array of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationPrompt {
    messages: Vec<ChatMessage>,
}

impl ConversationPrompt {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Content of the first message with the given role, or `""`.
    pub fn content_for(&self, role: Role) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    /// Flatten into the single-text form used by text-generation endpoints:
    /// `Prompt: <user>\nSystem: <system>`.
    pub fn as_single_text(&self) -> String {
        format!(
            "Prompt: {}\nSystem: {}",
            self.content_for(Role::User),
            self.content_for(Role::System)
        )
    }
}

// ─── Request Types ───────────────────────────────────────────────────────────

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    pub model: &'a str,
    pub temperature: f32,
}

/// Request body for a hosted text-generation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TextGenerationRequest {
    pub inputs: String,
    /// Always sent, even when empty.
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl TextGenerationRequest {
    pub fn from_prompt(prompt: &ConversationPrompt) -> Self {
        Self {
            inputs: prompt.as_single_text(),
            parameters: serde_json::Map::new(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
