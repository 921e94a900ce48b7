//! Environment variable substitution and effective-value accessors.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;

use super::types::Config;

use crate::constants::{
    ANONYMOUS_TOKEN, AUTH_TOKEN_ENV, DEFAULT_BACKEND_URL, DEFAULT_LOG_LEVEL, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use crate::provider::ProviderKind;

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        for field in [
            &mut self.system_prompt,
            &mut self.log_level,
            &mut self.backend.base_url,
            &mut self.backend.auth_token,
        ] {
            if let Some(value) = field {
                *value = Self::resolve_str(value);
            }
        }
        for value in self.backend.endpoints.values_mut() {
            *value = Self::resolve_str(value);
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    pub(super) fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!(
                    "{}{}{}",
                    &result[..start],
                    value,
                    &result[start + end + 1..]
                );
            } else {
                break;
            }
        }
        result
    }

    /// Resolve the bearer token: env var first, then config, then anonymous.
    pub fn resolve_auth_token(&self) -> String {
        Self::pick_auth_token(std::env::var(AUTH_TOKEN_ENV).ok(), self.backend.auth_token.clone())
    }

    pub(super) fn pick_auth_token(env: Option<String>, configured: Option<String>) -> String {
        [env, configured]
            .into_iter()
            .flatten()
            .find(|token| !token.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS_TOKEN.to_string())
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Whether the fallback cascade is on. Defaults to enabled.
    pub fn fallback_enabled(&self) -> bool {
        self.fallback.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn base_url(&self) -> &str {
        self.backend
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Configured endpoint names keyed by the provider's default endpoint.
    /// Empty names are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not a known provider.
    pub fn endpoint_overrides(&self) -> Result<HashMap<String, String>> {
        let mut overrides = HashMap::new();
        for (tag, name) in &self.backend.endpoints {
            let provider = ProviderKind::from_str(tag)?;
            let name = name.trim();
            if !name.is_empty() {
                overrides.insert(provider.endpoint().to_string(), name.to_string());
            }
        }
        Ok(overrides)
    }
}
