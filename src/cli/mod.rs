//! Command-line interface definition and dispatch for chatelix.
//!
//! Uses [`clap`] for argument parsing with derive macros. Streaming lives in
//! the [`ask`] submodule; the read-only inspection commands in [`inspect`].

mod ask;
mod inspect;

use crate::config;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

/// Top-level CLI structure for chatelix.
#[derive(Parser)]
#[command(
    name = "chatelix",
    about = "Route, stream and recover chat generations across model providers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the chatelix CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Stream an answer to a one-shot question
    Ask(AskArgs),
    /// Analyse a prompt and rank models for it
    Recommend {
        /// The task description
        prompt: Vec<String>,
        /// Number of models to show
        #[arg(short = 'n', long, default_value_t = crate::constants::DEFAULT_RECOMMENDATIONS)]
        count: usize,
    },
    /// List the model catalog grouped by provider
    Models {
        /// Only list models served by this provider (openai, claude, gemini, deepseek, openrouter)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Show which provider and endpoint serve a model
    Route {
        /// Model identifier, e.g. "anthropic/claude-3.5-sonnet"
        model: String,
    },
    /// Classify an error message and show how to recover
    Diagnose {
        /// The error text
        message: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct AskArgs {
    /// The question to ask
    pub prompt: Vec<String>,
    /// Model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,
    /// Sampling temperature (overrides config)
    #[arg(long)]
    pub temperature: Option<f32>,
    /// Completion token limit (overrides config)
    #[arg(long)]
    pub max_tokens: Option<u32>,
    /// System prompt (overrides config)
    #[arg(long)]
    pub system: Option<String>,
    /// Fail on the first error instead of trying other models
    #[arg(long)]
    pub no_fallback: bool,
    /// Retry retryable failures using the error's retry schedule
    #[arg(long)]
    pub retry: bool,
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current config
    Show,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli, config: config::Config) -> Result<()> {
    match cli.command {
        Commands::Ask(args) => ask::ask(args, &config).await,
        Commands::Recommend { prompt, count } => inspect::recommend(&prompt.join(" "), count),
        Commands::Models { provider } => inspect::models(provider.as_deref()),
        Commands::Route { model } => {
            inspect::route(&model);
            Ok(())
        }
        Commands::Diagnose { message } => {
            inspect::diagnose(&message.join(" "));
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let path = config::Config::config_path()?;
                println!("{} {}", "Config path:".bold(), path.display());
                println!();
                println!("{}", config.to_display_toml()?);
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_flags() {
        let cli = Cli::try_parse_from([
            "chatelix",
            "ask",
            "-m",
            "openai/gpt-5",
            "--temperature",
            "0.3",
            "--no-fallback",
            "--retry",
            "explain",
            "lifetimes",
        ])
        .unwrap();
        let Commands::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.prompt, vec!["explain", "lifetimes"]);
        assert_eq!(args.model.as_deref(), Some("openai/gpt-5"));
        assert_eq!(args.temperature, Some(0.3));
        assert!(args.no_fallback);
        assert!(args.retry);
        assert_eq!(args.max_tokens, None);
    }

    #[test]
    fn test_recommend_default_count() {
        let cli = Cli::try_parse_from(["chatelix", "recommend", "write", "a", "poem"]).unwrap();
        let Commands::Recommend { prompt, count } = cli.command else {
            panic!("expected recommend");
        };
        assert_eq!(prompt.join(" "), "write a poem");
        assert_eq!(count, crate::constants::DEFAULT_RECOMMENDATIONS);
    }

    #[test]
    fn test_route_requires_model() {
        assert!(Cli::try_parse_from(["chatelix", "route"]).is_err());
    }
}
