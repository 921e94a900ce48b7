//! Recovery actions and retry schedules derived from an [`ErrorInfo`].
//!
//! Both are advisory: the fallback cascade has a fixed length and does not
//! consult them. Callers wrapping a whole request in their own retry loop use
//! [`retry_strategy`] to decide whether and when to try again.

use std::time::Duration;

use super::{ErrorCode, ErrorInfo, Severity};

/// What a caller should do about a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryAction {
    /// Try the same request again after `delay`.
    Retry { delay: Duration, message: String },
    /// Switch to another model.
    Fallback { model: &'static str, message: String },
    /// Nothing automatic will help.
    Manual { message: String },
}

/// Maps a classification onto one of the three recovery strategies.
pub fn recovery_action(info: &ErrorInfo) -> RecoveryAction {
    let retry = |secs: u64, message: &str| RecoveryAction::Retry {
        delay: Duration::from_secs(secs),
        message: message.to_string(),
    };
    let fallback = |message: &str| match info.fallback_model {
        Some(model) => RecoveryAction::Fallback {
            model,
            message: format!("{message} Switching to {model}."),
        },
        None => RecoveryAction::Manual {
            message: message.to_string(),
        },
    };

    match info.code {
        ErrorCode::RateLimit => retry(5, "Rate limited, retrying shortly."),
        ErrorCode::NetworkError => retry(2, "Connection problem, retrying."),
        ErrorCode::Timeout => retry(3, "Request timed out, retrying."),
        ErrorCode::ModelOffline => fallback("Model is unavailable."),
        ErrorCode::QuotaExceeded => fallback("Quota exceeded."),
        ErrorCode::Unknown if info.fallback_model.is_some() => {
            fallback("Unexpected error.")
        }
        ErrorCode::Unknown => retry(2, "Unexpected error, retrying."),
        ErrorCode::ApiKey => RecoveryAction::Manual {
            message: "Check your credentials and sign in again.".to_string(),
        },
        ErrorCode::ContextLength => RecoveryAction::Manual {
            message: "Shorten the conversation or start a new one.".to_string(),
        },
        ErrorCode::ContentFilter => RecoveryAction::Manual {
            message: "Rephrase the request.".to_string(),
        },
    }
}

/// Retry schedule: `max_retries` attempts, the first after `base_delay`,
/// each later one `backoff_multiplier` times longer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryStrategy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetryStrategy {
    /// Delay before retry number `attempt` (0-based), or `None` once the
    /// budget is spent.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        let factor = self.backoff_multiplier.powi(attempt as i32);
        Some(self.base_delay.mul_f64(factor))
    }

    /// The full delay schedule.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).filter_map(|attempt| self.delay_for(attempt))
    }
}

/// Severity-indexed retry table.
pub fn retry_strategy(info: &ErrorInfo) -> RetryStrategy {
    match info.severity {
        Severity::Low => RetryStrategy {
            max_retries: 1,
            base_delay: Duration::from_secs(1),
            backoff_multiplier: 1.0,
        },
        Severity::Medium => RetryStrategy {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
            backoff_multiplier: 1.5,
        },
        Severity::High => RetryStrategy {
            max_retries: 0,
            base_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        },
    }
}
