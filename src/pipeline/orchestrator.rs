//! Inference orchestrator: prompt → cache → provider → extraction.
//!
//! One pass per call:
//! 1. **Credentials** — resolved when the provider is built; a missing key
//!    fails before any network traffic.
//! 2. **Prompt** — `[system, user]` conversation.
//! 3. **Cache** — keyed by the user text only; a hit skips the provider.
//! 4. **Provider** — on a miss; only successful documents are cached.
//! 5. **Extract** — text from whichever document is in hand.
//!
//! No retries. Two concurrent misses for the same key both reach the
//! provider and the last cache write wins.

use std::sync::OnceLock;

use serde_json::Value;

use crate::cache::{CacheKey, ResponseCache};
use crate::inference::config::InferenceConfig;
use crate::inference::errors::InferenceError;
use crate::inference::provider::{InferenceProvider, Provider};
use crate::inference::types::ConversationPrompt;

use super::prompt::build_prompt;

/// Where the response document for a call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentSource {
    Cache,
    Provider,
}

/// The cached-inference pipeline over a provider `P`.
pub struct Inference<P = Provider> {
    provider: P,
    cache: Option<ResponseCache>,
}

impl Inference<Provider> {
    /// Build the pipeline selected by `config`.
    ///
    /// Fails with `ConfigError` if the selected provider's credential is
    /// missing.
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let provider = Provider::from_config(config)?;
        let cache = config
            .cache
            .enabled
            .then(|| ResponseCache::new(&config.cache.dir));
        Ok(Self::new(provider, cache))
    }
}

impl<P: InferenceProvider> Inference<P> {
    pub fn new(provider: P, cache: Option<ResponseCache>) -> Self {
        Self { provider, cache }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Run one prompt through the pipeline and return the generated text.
    pub async fn run_inference(
        &self,
        user_text: &str,
        system_text: &str,
    ) -> Result<String, InferenceError> {
        tracing::info!(
            provider = self.provider.name(),
            prompt = user_text,
            "running inference"
        );

        let prompt = build_prompt(user_text, system_text);
        let key = CacheKey::for_text(user_text);

        let (document, source) = self.fetch_document(&prompt, &key).await?;
        let text = self.provider.extract_text(&document)?;

        tracing::info!(source = ?source, chars = text.len(), "inference result");
        Ok(text)
    }

    /// Like [`run_inference`](Self::run_inference), but folds provider and
    /// extraction failures into their legacy error strings.
    ///
    /// Only `ConfigError` is returned as `Err`.
    pub async fn run_inference_text(
        &self,
        user_text: &str,
        system_text: &str,
    ) -> Result<String, InferenceError> {
        match self.run_inference(user_text, system_text).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_config_error() => Err(e),
            Err(e) => Ok(e.legacy_text()),
        }
    }

    /// Return the cached document for `key`, or call the provider and cache
    /// its answer.
    async fn fetch_document(
        &self,
        prompt: &ConversationPrompt,
        key: &CacheKey,
    ) -> Result<(Value, DocumentSource), InferenceError> {
        if let Some(doc) = self.cache.as_ref().and_then(|c| c.read(key)) {
            tracing::info!(key = %key, "returning cached response");
            return Ok((doc, DocumentSource::Cache));
        }

        tracing::info!(provider = self.provider.name(), "calling provider");
        let doc = self.provider.complete(prompt).await?;

        if let Some(cache) = &self.cache {
            if !cache.write(key, &doc) {
                tracing::warn!(key = %key, "continuing without cache write");
            }
        }
        Ok((doc, DocumentSource::Provider))
    }
}

/// Pipeline shared by every call to [`run_inference`].
static SHARED: OnceLock<Inference> = OnceLock::new();

/// Run a single prompt through a process-wide pipeline.
///
/// The first successful call resolves configuration from the environment
/// (including `.env`) and builds the pipeline; later calls reuse it. A
/// failed build, such as a missing credential, is not remembered.
pub async fn run_inference(
    prompt_content: &str,
    system_message: &str,
) -> Result<String, InferenceError> {
    let inference = shared_inference(&SHARED, || {
        let config = InferenceConfig::from_env()?;
        Inference::from_config(&config)
    })?;
    inference.run_inference(prompt_content, system_message).await
}

/// Return the pipeline in `cell`, building it with `build` if empty.
fn shared_inference<P, F>(
    cell: &OnceLock<Inference<P>>,
    build: F,
) -> Result<&Inference<P>, InferenceError>
where
    P: InferenceProvider,
    F: FnOnce() -> Result<Inference<P>, InferenceError>,
{
    if let Some(existing) = cell.get() {
        return Ok(existing);
    }
    let built = build()?;
    tracing::info!(provider = built.provider.name(), "shared inference pipeline built");
    Ok(cell.get_or_init(|| built))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
