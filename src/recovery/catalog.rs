//! Error classification rules and the per-kind recovery catalog.

use super::{ErrorCode, Severity};

/// Keyword rule mapping lowercase error text to an [`ErrorCode`].
pub(super) struct ClassificationRule {
    pub keywords: &'static [&'static str],
    pub code: ErrorCode,
}

/// Evaluated in order; first rule with a matching keyword wins.
pub(super) const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        keywords: &["rate limit", "429"],
        code: ErrorCode::RateLimit,
    },
    ClassificationRule {
        keywords: &["offline", "unavailable", "503"],
        code: ErrorCode::ModelOffline,
    },
    ClassificationRule {
        keywords: &["context", "token limit", "413"],
        code: ErrorCode::ContextLength,
    },
    ClassificationRule {
        keywords: &["api key", "unauthorized", "401"],
        code: ErrorCode::ApiKey,
    },
    ClassificationRule {
        keywords: &["quota", "billing", "402"],
        code: ErrorCode::QuotaExceeded,
    },
    ClassificationRule {
        keywords: &["network", "connection", "fetch"],
        code: ErrorCode::NetworkError,
    },
    ClassificationRule {
        keywords: &["timeout", "408"],
        code: ErrorCode::Timeout,
    },
    ClassificationRule {
        keywords: &["content", "filter", "policy"],
        code: ErrorCode::ContentFilter,
    },
];

/// Static description of one error kind.
pub(super) struct CatalogEntry {
    pub code: ErrorCode,
    pub title: &'static str,
    pub severity: Severity,
    pub can_retry: bool,
    pub fallback_model: Option<&'static str>,
    pub suggestions: &'static [&'static str],
}

pub(super) const ERROR_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        code: ErrorCode::RateLimit,
        title: "Rate limit reached",
        severity: Severity::Medium,
        can_retry: true,
        fallback_model: Some("openai/gpt-4o-mini"),
        suggestions: &[
            "Wait a few seconds before sending another message",
            "Switch to a less busy model",
            "Upgrade your plan for higher rate limits",
        ],
    },
    CatalogEntry {
        code: ErrorCode::ModelOffline,
        title: "Model temporarily unavailable",
        severity: Severity::High,
        can_retry: false,
        fallback_model: Some("openai/gpt-4o-mini"),
        suggestions: &[
            "Try a different model",
            "Check the provider status page",
        ],
    },
    CatalogEntry {
        code: ErrorCode::ContextLength,
        title: "Conversation is too long for this model",
        severity: Severity::High,
        can_retry: false,
        fallback_model: Some("google/gemini-2.0-flash-001"),
        suggestions: &[
            "Start a new conversation",
            "Shorten your message or remove attachments",
            "Use a model with a larger context window",
        ],
    },
    CatalogEntry {
        code: ErrorCode::ApiKey,
        title: "Authentication failed",
        severity: Severity::High,
        can_retry: false,
        fallback_model: None,
        suggestions: &[
            "Sign in again to refresh your session",
            "Check that the provider API key is configured on the backend",
        ],
    },
    CatalogEntry {
        code: ErrorCode::QuotaExceeded,
        title: "Usage quota exceeded",
        severity: Severity::High,
        can_retry: false,
        fallback_model: Some("deepseek/deepseek-chat"),
        suggestions: &[
            "Check your billing settings",
            "Upgrade your plan or wait for the quota to reset",
            "Switch to a cheaper model",
        ],
    },
    CatalogEntry {
        code: ErrorCode::NetworkError,
        title: "Network problem",
        severity: Severity::Low,
        can_retry: true,
        fallback_model: None,
        suggestions: &[
            "Check your internet connection",
            "Retry in a moment",
        ],
    },
    CatalogEntry {
        code: ErrorCode::Timeout,
        title: "The request timed out",
        severity: Severity::Medium,
        can_retry: true,
        fallback_model: Some("openai/gpt-4o-mini"),
        suggestions: &[
            "Retry the request",
            "Ask for a shorter answer",
            "Switch to a faster model",
        ],
    },
    CatalogEntry {
        code: ErrorCode::ContentFilter,
        title: "Blocked by the content policy",
        severity: Severity::Medium,
        can_retry: false,
        fallback_model: Some("anthropic/claude-3.5-sonnet"),
        suggestions: &[
            "Rephrase your request",
            "Remove sensitive content from the prompt",
        ],
    },
    CatalogEntry {
        code: ErrorCode::Unknown,
        title: "Something went wrong",
        severity: Severity::Medium,
        can_retry: true,
        fallback_model: Some("openai/gpt-4o-mini"),
        suggestions: &[
            "Retry the request",
            "Try a different model",
        ],
    },
];

/// Catalog entry for `code`. Every code has exactly one entry.
pub(super) fn entry_for(code: ErrorCode) -> &'static CatalogEntry {
    ERROR_CATALOG
        .iter()
        .find(|e| e.code == code)
        .unwrap_or(&ERROR_CATALOG[ERROR_CATALOG.len() - 1])
}
