//! Configuration types and path resolution for chatelix.
//!
//! Chatelix stores its settings as TOML at the platform's XDG config path
//! (e.g. `~/.config/chatelix/config.toml` on Linux). A `chatelix.toml` in the
//! current directory or any parent up to the git root overrides it.

mod loader;
mod paths;
mod resolve;
mod types;

#[cfg(test)]
mod tests;

pub use types::Config;

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    /// Creates default config file if none exists.
    pub fn load() -> Result<Self> {
        let global = Self::load_global(&Self::config_path()?)?;
        let project = Self::load_project(std::env::current_dir()?)?;

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }

    /// Renders the effective config as TOML with the auth token masked.
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if let Some(token) = shown.backend.auth_token.as_mut() {
            if !token.is_empty() {
                *token = "********".to_string();
            }
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}
