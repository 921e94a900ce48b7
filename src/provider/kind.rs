//! Provider kind enumeration and endpoint mapping.
//!
//! Defines [`ProviderKind`] which identifies which backend proxy serves a
//! model, and the fixed endpoint name each provider is reached through.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Identifies which backend provider handles a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI (GPT and o-series models).
    OpenAI,
    /// Anthropic (Claude models).
    Claude,
    /// Google (Gemini models).
    Gemini,
    /// DeepSeek.
    DeepSeek,
    /// OpenRouter (multi-provider aggregator, the catch-all).
    OpenRouter,
}

impl ProviderKind {
    /// All provider kinds in resolution priority order.
    pub const ALL: [ProviderKind; 5] = [
        Self::OpenAI,
        Self::Gemini,
        Self::DeepSeek,
        Self::Claude,
        Self::OpenRouter,
    ];

    /// Parses a provider name string into a [`ProviderKind`].
    ///
    /// Matching is case-insensitive and accepts vendor aliases
    /// (`anthropic`, `google`). Returns an error for unknown providers.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "claude" | "anthropic" => Ok(Self::Claude),
            "gemini" | "google" => Ok(Self::Gemini),
            "deepseek" => Ok(Self::DeepSeek),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(anyhow!(
                "Unknown provider: {other}. Supported: openai, claude, gemini, deepseek, openrouter"
            )),
        }
    }

    /// Short tag used in logs and config keys.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Backend endpoint name serving this provider's chat streams.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai-chat",
            Self::Claude => "claude-chat",
            Self::Gemini => "gemini-chat",
            Self::DeepSeek => "deepseek-chat",
            Self::OpenRouter => "openrouter-chat",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
