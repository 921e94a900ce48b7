//! Error classification and recovery guidance.
//!
//! [`analyze_error`] maps any error's text onto a closed taxonomy of
//! [`ErrorCode`]s. Each kind carries a severity, whether a retry can help, a
//! default fallback model and user-facing suggestions. The companion
//! functions in [`retry`] turn a classification into a recovery action or a
//! retry schedule.

mod catalog;
pub mod retry;


use std::fmt::{self, Display};

use serde::Serialize;

pub use retry::{recovery_action, retry_strategy, RecoveryAction, RetryStrategy};

/// Closed set of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    RateLimit,
    ModelOffline,
    ContextLength,
    ApiKey,
    QuotaExceeded,
    NetworkError,
    Timeout,
    ContentFilter,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::ModelOffline => "model_offline",
            Self::ContextLength => "context_length",
            Self::ApiKey => "api_key",
            Self::QuotaExceeded => "quota_exceeded",
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::ContentFilter => "content_filter",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Classification of one failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    /// Short headline for display.
    pub title: &'static str,
    pub severity: Severity,
    pub can_retry: bool,
    pub fallback_model: Option<&'static str>,
    pub suggestions: &'static [&'static str],
    /// The original error text.
    pub message: String,
}

impl ErrorInfo {
    /// Classifies raw error text.
    pub fn from_message(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            "Unknown error"
        } else {
            message
        };
        let lower = message.to_lowercase();
        let code = catalog::CLASSIFICATION_RULES
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
            .map(|rule| rule.code)
            .unwrap_or(ErrorCode::Unknown);

        Self::for_code(code, message)
    }

    /// Builds the catalog entry for `code` carrying `message`.
    pub fn for_code(code: ErrorCode, message: impl Into<String>) -> Self {
        let entry = catalog::entry_for(code);
        Self {
            code,
            title: entry.title,
            severity: entry.severity,
            can_retry: entry.can_retry,
            fallback_model: entry.fallback_model,
            suggestions: entry.suggestions,
            message: message.into(),
        }
    }
}

/// Classifies any displayable error.
pub fn analyze_error<E: Display + ?Sized>(error: &E) -> ErrorInfo {
    ErrorInfo::from_message(&error.to_string())
}

/// Renders a classification as a block suitable for direct display.
pub fn format_user_message(info: &ErrorInfo) -> String {
    let mut out = format!("{}\n", info.title);
    if !info.suggestions.is_empty() {
        out.push_str("\nSuggestions:\n");
        for suggestion in info.suggestions {
            out.push_str(&format!("  • {suggestion}\n"));
        }
    }
    if let Some(model) = info.fallback_model {
        out.push_str(&format!("\nYou can also try {model}.\n"));
    }
    out
}

/// Low-severity errors that a retry will fix are not worth showing.
pub fn should_show_to_user(info: &ErrorInfo) -> bool {
    !(info.severity == Severity::Low && info.can_retry)
}
