//! Inference — provider clients for hosted LLM endpoints.
//!
//! This module handles all communication with the hosted model:
//! - Configuration resolved once from env, `.env`, and an optional YAML file
//! - OpenAI-style chat completions and Hugging Face-style text generation
//! - Extraction of generated text from each provider's response shape
//!
//! Clients return raw JSON documents so the pipeline can cache responses
//! verbatim and extract text afterwards.

pub mod client;
pub mod config;
pub mod errors;
pub mod extract;
pub mod huggingface;
pub mod provider;
pub mod types;

// Re-exports for convenience
pub use client::OpenAiClient;
pub use config::{Credentials, InferenceConfig, ProviderKind};
pub use errors::InferenceError;
pub use huggingface::HuggingFaceClient;
pub use provider::{InferenceProvider, Provider};
pub use types::{ChatMessage, ConversationPrompt, Role};
