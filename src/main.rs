//! Entry point for chatelix, a model dispatch and streaming client.
//!
//! This binary loads environment variables and configuration, sets up
//! logging, parses CLI arguments via [`cli`], and dispatches to the
//! appropriate subcommand handler.

mod cli;
mod config;
mod constants;
mod fallback;
mod format;
mod message;
mod models;
mod output;
mod provider;
mod recommend;
mod recovery;
mod stream;
mod tokens;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Runs the chatelix CLI.
///
/// Loads `.env` files (silently ignored if absent), reads the config,
/// installs the stderr log subscriber, and dispatches the chosen subcommand
/// via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    let config = config::Config::load()?;
    init_tracing(config.log_level());
    cli::run(cli, config).await
}

/// Logs go to stderr so stdout carries only model output.
/// `RUST_LOG` overrides the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
