//! Cached prompt inference against hosted LLM endpoints.
//!
//! Sends a user prompt plus system instruction to the configured provider,
//! caches the raw response on disk keyed by a digest of the user text, and
//! returns the generated text.
//!
//! ```no_run
//! # async fn demo() -> Result<(), cached_inference::InferenceError> {
//! let config = cached_inference::InferenceConfig::from_env()?;
//! let inference = cached_inference::Inference::from_config(&config)?;
//! let answer = inference.run_inference("What is 2+2?", "Answer concisely.").await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod inference;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CacheKey, ResponseCache};
pub use inference::{InferenceConfig, InferenceError, InferenceProvider, Provider, ProviderKind};
pub use pipeline::{build_prompt, run_inference, Inference};

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

/// Install a process-wide tracing subscriber writing to stderr.
///
/// Filter comes from `RUST_LOG`, defaulting to `cached_inference=info,warn`.
/// Logging setup belongs to the host application; this is offered for
/// binaries and scripts that have none. Returns an error, rather than
/// panicking, if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cached_inference=info,warn"));

    let builder = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    match format {
        LogFormat::Text => builder.try_init()?,
        LogFormat::Json => builder.json().try_init()?,
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        "=== cached_inference logging initialized ==="
    );
    Ok(())
}
