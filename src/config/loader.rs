//! File loading and merging for chatelix configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::{default_model, BackendConfig, Config};

impl Config {
    /// Loads the global config from `path`.
    ///
    /// If no config file exists, creates one with sensible defaults
    /// (including an `{env:VAR}` placeholder for the auth token) and returns it.
    pub(super) fn load_global(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_toml = format!(
                r#"model = "{}"
fallback = true

[backend]
base_url = "{}"
auth_token = "{{env:{}}}"
"#,
                default_model(),
                crate::constants::DEFAULT_BACKEND_URL,
                crate::constants::AUTH_TOKEN_ENV,
            );
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &default_toml)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            let config: Config = toml::from_str(&default_toml)
                .with_context(|| "Failed to parse default config".to_string())?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }

    /// Look for chatelix.toml in `start`, then walk up to the git root.
    pub(super) fn load_project(start: PathBuf) -> Result<Option<Config>> {
        let mut dir = start;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                let contents = fs::read_to_string(&candidate)
                    .with_context(|| format!("Failed to read {:?}", candidate))?;
                let config: Config = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse {:?}", candidate))?;
                return Ok(Some(config));
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: if project.model != default_model() {
                project.model
            } else {
                global.model
            },
            temperature: project.temperature.or(global.temperature),
            max_tokens: project.max_tokens.or(global.max_tokens),
            fallback: project.fallback.or(global.fallback),
            system_prompt: project.system_prompt.or(global.system_prompt),
            log_level: project.log_level.or(global.log_level),
            backend: BackendConfig {
                base_url: project.backend.base_url.or(global.backend.base_url),
                auth_token: project.backend.auth_token.or(global.backend.auth_token),
                timeout_secs: project.backend.timeout_secs.or(global.backend.timeout_secs),
                endpoints: {
                    let mut endpoints = global.backend.endpoints;
                    endpoints.extend(project.backend.endpoints);
                    endpoints
                },
            },
        }
    }
}
