//! Inference configuration loading.
//!
//! The configuration is resolved once, at startup, into an immutable
//! [`InferenceConfig`] that is passed explicitly to every component.
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults.
//! 2. An optional YAML file (`INFERENCE_CONFIG`), with `${VAR}` and
//!    `${VAR:-default}` interpolation.
//! 3. Environment variables (after loading a local `.env`, if present).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use super::errors::InferenceError;

// ─── Environment Variables ───────────────────────────────────────────────────

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_HUGGINGFACE_TOKEN: &str = "HUGGINGFACEHUB_API_TOKEN";
pub const ENV_HUGGINGFACE_ENDPOINT: &str = "HUGGINGFACE_ENDPOINT_URL";
pub const ENV_PROVIDER: &str = "INFERENCE_PROVIDER";
pub const ENV_CACHE_DIR: &str = "INFERENCE_CACHE_DIR";
pub const ENV_CONFIG_PATH: &str = "INFERENCE_CONFIG";

// ─── Public Types ────────────────────────────────────────────────────────────

/// Which hosted provider answers requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ProviderKind {
    /// OpenAI Chat Completions API.
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Hugging Face hosted inference endpoint.
    #[serde(rename = "huggingface")]
    HuggingFace,
}

impl FromStr for ProviderKind {
    type Err = InferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            other => Err(InferenceError::ConfigError {
                reason: format!("unknown provider '{other}' (expected 'openai' or 'huggingface')"),
            }),
        }
    }
}

/// OpenAI-style chat completion settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// 0.0 keeps sampling as deterministic as the provider allows.
    #[serde(default)]
    pub temperature: f32,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

/// Hugging Face inference endpoint settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HuggingFaceSettings {
    /// Full URL of the deployed endpoint. Empty means "not configured".
    #[serde(default)]
    pub endpoint_url: String,
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            enabled: true,
        }
    }
}

/// Provider credentials. Never logged.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub huggingface_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("huggingface_token", &redact(&self.huggingface_token))
            .finish()
    }
}

impl Credentials {
    /// The OpenAI API key, or a config error naming the missing variable.
    pub fn openai_api_key(&self) -> Result<&str, InferenceError> {
        require(self.openai_api_key.as_deref(), ENV_OPENAI_API_KEY)
    }

    /// The Hugging Face token, or a config error naming the missing variable.
    pub fn huggingface_token(&self) -> Result<&str, InferenceError> {
        require(self.huggingface_token.as_deref(), ENV_HUGGINGFACE_TOKEN)
    }
}

fn require<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str, InferenceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            tracing::error!(var, "credential is not set in the environment variables");
            Err(InferenceError::ConfigError {
                reason: format!("{var} is not set in the environment variables."),
            })
        }
    }
}

/// Top-level configuration (mirrors the optional YAML file).
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub huggingface: HuggingFaceSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    /// Total request timeout for provider calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Filled from the environment only, never from the file.
    #[serde(skip)]
    pub credentials: Credentials,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            openai: OpenAiSettings::default(),
            huggingface: HuggingFaceSettings::default(),
            cache: CacheSettings::default(),
            request_timeout_secs: default_request_timeout_secs(),
            credentials: Credentials::default(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_openai_model() -> String {
    "gpt-4o-mini".into()
}
fn default_max_tokens() -> u32 {
    512
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("utilities/cache")
}
fn default_true() -> bool {
    true
}
fn default_request_timeout_secs() -> u64 {
    60
}

// ─── Loading ─────────────────────────────────────────────────────────────────

impl InferenceConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// Loads `.env` from the working directory (if any), then the YAML file
    /// named by `INFERENCE_CONFIG` (if set), then applies env overrides.
    /// Missing credentials are not an error here; they surface when the
    /// provider that needs them is built.
    pub fn from_env() -> Result<Self, InferenceError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) if !path.is_empty() => load_config_file(Path::new(&path))?,
            _ => InferenceConfig::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;

        tracing::info!(
            provider = ?config.provider,
            cache_dir = %config.cache.dir.display(),
            cache_enabled = config.cache.enabled,
            credentials = ?config.credentials,
            "inference config resolved"
        );
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), InferenceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(kind) = lookup(ENV_PROVIDER) {
            self.provider = kind.parse()?;
        }
        if let Some(url) = lookup(ENV_HUGGINGFACE_ENDPOINT) {
            self.huggingface.endpoint_url = url;
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR) {
            self.cache.dir = PathBuf::from(expand_tilde(&dir));
        }
        self.credentials.openai_api_key = lookup(ENV_OPENAI_API_KEY);
        self.credentials.huggingface_token = lookup(ENV_HUGGINGFACE_TOKEN);
        Ok(())
    }
}

/// Load and parse a YAML configuration file.
///
/// Performs environment-variable interpolation on string values matching
/// `${VAR_NAME}` or `${VAR_NAME:-default}`.
pub fn load_config_file(path: &Path) -> Result<InferenceConfig, InferenceError> {
    let raw = std::fs::read_to_string(path).map_err(|e| InferenceError::ConfigError {
        reason: format!("failed to read {}: {e}", path.display()),
    })?;

    parse_config(&raw)
}

/// Parse configuration YAML after env interpolation.
pub fn parse_config(raw: &str) -> Result<InferenceConfig, InferenceError> {
    let interpolated = interpolate_env_vars(raw);

    let mut config: InferenceConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| InferenceError::ConfigError {
            reason: format!("failed to parse config: {e}"),
        })?;

    config.cache.dir = PathBuf::from(expand_tilde(&config.cache.dir.to_string_lossy()));
    Ok(config)
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in a string.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve a variable expression like `VAR` or `VAR:-default`.
fn resolve_var_expr(expr: &str) -> String {
    if let Some((var_name, default)) = expr.split_once(":-") {
        std::env::var(var_name).unwrap_or_else(|_| expand_tilde(default))
    } else {
        std::env::var(expr).unwrap_or_default()
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.display());
        }
    }
    path.to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
