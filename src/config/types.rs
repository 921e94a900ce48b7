//! Struct definitions and serde defaults for chatelix configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for chatelix, deserialized from `config.toml`.
///
/// Fields use serde defaults so chatelix can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Default model identifier (e.g. `"openai/gpt-4o-mini"`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature sent with every request.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Completion token limit.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Whether failed generations fall back to other models.
    #[serde(default)]
    pub fallback: Option<bool>,
    /// Optional system prompt prepended to all conversations.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Log filter used when `RUST_LOG` is unset (e.g. `"info"`, `"chatelix=debug"`).
    #[serde(default)]
    pub log_level: Option<String>,
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Returns the default model identifier.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization.
pub(super) fn default_model() -> String {
    crate::constants::DEFAULT_MODEL.to_string()
}

/// Where the per-provider chat endpoints live and how to authenticate.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BackendConfig {
    /// Base URL; endpoints are mounted under `{base_url}/functions/v1/`.
    pub base_url: Option<String>,
    /// Session token. `CHATELIX_AUTH_TOKEN` takes precedence.
    pub auth_token: Option<String>,
    /// Connect and read timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Endpoint names replacing the defaults, keyed by provider tag
    /// (`[backend.endpoints]`, e.g. `openai = "openai-chat-v2"`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoints: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: None,
            max_tokens: None,
            fallback: None,
            system_prompt: None,
            log_level: None,
            backend: BackendConfig::default(),
        }
    }
}
