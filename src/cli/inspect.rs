//! Read-only inspection commands: recommend, models, route and diagnose.

use anyhow::Result;
use colored::Colorize;

use crate::format;
use crate::models::ModelCatalog;
use crate::provider::{resolve_provider, ProviderKind};
use crate::recommend::{analyze_prompt, recommendations};
use crate::recovery::{
    format_user_message, recovery_action, retry_strategy, should_show_to_user, ErrorInfo,
};

pub(crate) fn recommend(prompt: &str, count: usize) -> Result<()> {
    if prompt.trim().is_empty() {
        anyhow::bail!("No prompt provided. Usage: chatelix recommend \"describe your task\"");
    }
    let catalog = ModelCatalog::popular();
    let analysis = analyze_prompt(prompt);

    println!("{}", "Analysis".bold());
    println!("{}", format::format_analysis(&analysis));
    println!();
    println!("{}", "Recommended models".bold());
    for (i, rec) in recommendations(&catalog, &analysis, count).iter().enumerate() {
        println!("{}", format::format_recommendation(i + 1, rec));
    }
    Ok(())
}

pub(crate) fn models(only: Option<&str>) -> Result<()> {
    let only = only.map(ProviderKind::from_str).transpose()?;
    let catalog = ModelCatalog::popular();
    for provider in ProviderKind::ALL {
        if only.is_some_and(|p| p != provider) {
            continue;
        }
        let rows: Vec<_> = catalog
            .iter()
            .filter(|m| resolve_provider(m.id) == provider)
            .collect();
        if rows.is_empty() {
            continue;
        }
        println!(
            "{} {}",
            provider.tag().bold().cyan(),
            format!("({})", provider.endpoint()).dimmed()
        );
        for model in rows {
            println!("{}", format::format_model_row(model));
        }
        println!();
    }
    println!("{}", format!("{} models in catalog", catalog.len()).dimmed());
    Ok(())
}

pub(crate) fn route(model: &str) {
    println!("{}", format::format_route(model));
}

pub(crate) fn diagnose(message: &str) {
    let info = ErrorInfo::from_message(message);
    println!("{}", format::format_error_info(&info));
    println!();
    if should_show_to_user(&info) {
        print!("{}", format_user_message(&info));
    } else {
        println!(
            "{}",
            "Transient and self-healing; not shown to users.".dimmed()
        );
    }
    println!();
    println!(
        "{} {}",
        "action:".dimmed(),
        format::format_recovery_action(&recovery_action(&info))
    );
    println!(
        "{} {}",
        "retries:".dimmed(),
        format::format_retry_strategy(&retry_strategy(&info))
    );
}
