//! Terminal rendering for recommendations, models and error diagnoses.

use colored::Colorize;
use serde::Serialize;

use crate::models::ModelDescriptor;
use crate::provider::resolve_provider;
use crate::recommend::{Recommendation, TaskAnalysis};
use crate::recovery::{ErrorInfo, RecoveryAction, RetryStrategy, Severity};
use crate::tokens::format_cost;

/// Lowercase wire name of a serde enum value (e.g. `TaskType::Code` → `"code"`).
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "?".to_string(),
    }
}

/// One line per analysed dimension.
pub fn format_analysis(analysis: &TaskAnalysis) -> String {
    let rows = [
        ("task", label(&analysis.task)),
        ("complexity", label(&analysis.complexity)),
        ("length", label(&analysis.length)),
        ("budget", label(&analysis.budget)),
        ("speed", label(&analysis.speed)),
    ];
    rows.iter()
        .map(|(name, value)| format!("  {:<11} {}", format!("{name}:").dimmed(), value.cyan()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A ranked recommendation, `rank` starting at 1.
pub fn format_recommendation(rank: usize, rec: &Recommendation<'_>) -> String {
    let score = format!("{:>3}", rec.score);
    let score = if rec.score >= 80 {
        score.green().bold()
    } else if rec.score >= 60 {
        score.yellow()
    } else {
        score.normal()
    };
    let mut out = format!(
        "{}. {} {}  {}\n",
        rank,
        score,
        rec.model.id.bold(),
        rec.model.name.dimmed()
    );
    out.push_str(&format!("     {}\n", rec.reason));
    if !rec.tags.is_empty() {
        out.push_str(&format!("     tags: {}\n", rec.tags.join(", ").cyan()));
    }
    out.push_str(&format!(
        "     ~{} per exchange, {} responses\n",
        format_cost(rec.estimated_cost),
        label(&rec.expected_speed)
    ));
    out.push_str(&format!("     {}", rec.match_explanation.dimmed()));
    out
}

/// A catalog row: id, category, context window and prompt price.
pub fn format_model_row(model: &ModelDescriptor) -> String {
    let per_million = model.pricing.prompt_per_token * 1_000_000.0;
    let price = if per_million == 0.0 {
        "free".green().to_string()
    } else {
        format!("${per_million:.2}/M")
    };
    format!(
        "  {:<40} {:<10} {:>9} ctx  {}",
        model.id,
        model.category,
        format_context(model.context_length),
        price
    )
}

fn format_context(tokens: u32) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else {
        format!("{}k", tokens / 1_000)
    }
}

/// Provider tag and endpoint for a model id.
pub fn format_route(model: &str) -> String {
    let provider = resolve_provider(model);
    format!(
        "{} → {} ({})",
        model.bold(),
        provider.tag().cyan(),
        provider.endpoint()
    )
}

fn format_severity(severity: Severity) -> String {
    let text = severity.to_string();
    match severity {
        Severity::Low => text.green().to_string(),
        Severity::Medium => text.yellow().to_string(),
        Severity::High => text.red().bold().to_string(),
    }
}

/// Classification summary of an error.
pub fn format_error_info(info: &ErrorInfo) -> String {
    format!(
        "{} {}\n{} {}\n{} {}\n{} {}",
        "kind:".dimmed(),
        info.code.as_str().bold(),
        "severity:".dimmed(),
        format_severity(info.severity),
        "retryable:".dimmed(),
        if info.can_retry { "yes" } else { "no" },
        "fallback:".dimmed(),
        info.fallback_model.unwrap_or("none"),
    )
}

pub fn format_recovery_action(action: &RecoveryAction) -> String {
    match action {
        RecoveryAction::Retry { delay, message } => {
            format!("{} in {}s: {}", "retry".yellow(), delay.as_secs_f64(), message)
        }
        RecoveryAction::Fallback { model, message } => {
            format!("{} to {}: {}", "fallback".cyan(), model.bold(), message)
        }
        RecoveryAction::Manual { message } => format!("{}: {}", "manual".red(), message),
    }
}

pub fn format_retry_strategy(strategy: &RetryStrategy) -> String {
    if strategy.max_retries == 0 {
        return "no automatic retries".dimmed().to_string();
    }
    let schedule = strategy
        .delays()
        .map(|d| format!("{}s", d.as_secs_f64()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "up to {} retr{} (delays: {})",
        strategy.max_retries,
        if strategy.max_retries == 1 { "y" } else { "ies" },
        schedule
    )
}
