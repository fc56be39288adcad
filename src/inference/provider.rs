//! Provider selection.
//!
//! [`InferenceProvider`] is the seam the pipeline talks to. [`Provider`] is
//! the production implementation, one variant per supported backend, chosen
//! from [`InferenceConfig::provider`].

use std::future::Future;

use serde_json::Value;

use super::client::OpenAiClient;
use super::config::{InferenceConfig, ProviderKind};
use super::errors::InferenceError;
use super::extract::{extract_chat_content, extract_generated_text};
use super::huggingface::HuggingFaceClient;
use super::types::ConversationPrompt;

/// A backend that turns a prompt into a raw response document and knows how
/// to read text back out of that document.
pub trait InferenceProvider {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Send the prompt; `Ok` carries the provider's raw JSON document.
    fn complete(
        &self,
        prompt: &ConversationPrompt,
    ) -> impl Future<Output = Result<Value, InferenceError>> + Send;

    /// Pull the generated text out of a document this provider produced.
    fn extract_text(&self, document: &Value) -> Result<String, InferenceError>;
}

/// The configured hosted provider.
pub enum Provider {
    OpenAi(OpenAiClient),
    HuggingFace(HuggingFaceClient),
}

impl Provider {
    /// Build the provider selected by `config`, resolving its credential.
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        match config.provider {
            ProviderKind::OpenAi => Ok(Provider::OpenAi(OpenAiClient::from_config(config)?)),
            ProviderKind::HuggingFace => {
                Ok(Provider::HuggingFace(HuggingFaceClient::from_config(config)?))
            }
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenAi(_) => ProviderKind::OpenAi,
            Provider::HuggingFace(_) => ProviderKind::HuggingFace,
        }
    }
}

impl InferenceProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi(_) => "openai",
            Provider::HuggingFace(_) => "huggingface",
        }
    }

    async fn complete(&self, prompt: &ConversationPrompt) -> Result<Value, InferenceError> {
        match self {
            Provider::OpenAi(client) => client.complete(prompt).await,
            Provider::HuggingFace(client) => client.complete(prompt).await,
        }
    }

    fn extract_text(&self, document: &Value) -> Result<String, InferenceError> {
        match self {
            Provider::OpenAi(_) => extract_chat_content(document),
            Provider::HuggingFace(_) => extract_generated_text(document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_config_defaults_to_openai() {
        let mut config = InferenceConfig::default();
        config.credentials.openai_api_key = Some("sk-test".into());

        let provider = Provider::from_config(&config).unwrap();
        assert_eq!(provider.kind(), ProviderKind::OpenAi);
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_from_config_selects_huggingface() {
        let mut config = InferenceConfig::default();
        config.provider = ProviderKind::HuggingFace;
        config.huggingface.endpoint_url = "https://example.endpoints.huggingface.cloud".into();
        config.credentials.huggingface_token = Some("hf_test".into());

        let provider = Provider::from_config(&config).unwrap();
        assert_eq!(provider.kind(), ProviderKind::HuggingFace);
    }

    #[test]
    fn test_from_config_missing_credential_for_selected_provider() {
        let mut config = InferenceConfig::default();
        config.provider = ProviderKind::HuggingFace;
        // An OpenAI key does not satisfy the Hugging Face path.
        config.credentials.openai_api_key = Some("sk-test".into());

        let err = Provider::from_config(&config).err().unwrap();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("HUGGINGFACEHUB_API_TOKEN"));
    }

    #[test]
    fn test_extract_text_follows_provider_shape() {
        let mut config = InferenceConfig::default();
        config.credentials.openai_api_key = Some("sk-test".into());
        let openai = Provider::from_config(&config).unwrap();

        let chat = json!({"choices": [{"message": {"content": "4"}}]});
        let generated = json!([{"generated_text": "4"}]);
        assert_eq!(openai.extract_text(&chat).unwrap(), "4");
        assert!(openai.extract_text(&generated).is_err());
    }
}
