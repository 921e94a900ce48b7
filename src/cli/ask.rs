//! The `ask` command: one streamed generation with fallback, retries and
//! Ctrl-C cancellation.

use anyhow::{anyhow, Result};
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::AskArgs;
use crate::config::Config;
use crate::fallback::{FallbackOrchestrator, FallbackOutcome};
use crate::message::Message;
use crate::models::ModelCatalog;
use crate::output::StdoutRenderer;
use crate::recovery::{analyze_error, retry_strategy};
use crate::stream::{drive, stream_generation, HttpTransport, StreamError, StreamOutcome, StreamRequest};
use crate::tokens;

/// Model that answered and the attempts it took, or `None` if cancelled.
type Answered = Option<(String, usize)>;

pub(crate) async fn ask(args: AskArgs, config: &Config) -> Result<()> {
    let prompt = args.prompt.join(" ");
    if prompt.trim().is_empty() {
        anyhow::bail!("No prompt provided. Usage: chatelix ask \"your question here\"");
    }

    let mut messages = Vec::new();
    if let Some(sp) = args.system.clone().or_else(|| config.system_prompt.clone()) {
        messages.push(Message::system(sp));
    }
    messages.push(Message::user(&prompt));

    let model = args.model.clone().unwrap_or_else(|| config.model.clone());
    let mut request = StreamRequest::new(messages, model);
    request.temperature = args.temperature.unwrap_or_else(|| config.temperature());
    request.max_tokens = args.max_tokens.unwrap_or_else(|| config.max_tokens());

    let catalog = ModelCatalog::popular();
    println!(
        "{} [model: {}]",
        "chatelix".bold().cyan(),
        request.model.yellow(),
    );
    print_estimate(&request, &catalog);
    println!();
    println!("{} {}", ">".green().bold(), prompt);
    println!();

    let transport = HttpTransport::new(config.base_url(), &config.resolve_auth_token(), config.timeout())?
        .with_endpoint_overrides(config.endpoint_overrides()?);
    let use_fallback = !args.no_fallback && config.fallback_enabled();

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut renderer = StdoutRenderer::new();
    let mut attempt = 0;
    let result = loop {
        let result: Result<Answered, StreamError> = if use_fallback {
            FallbackOrchestrator::new(&transport, &catalog)
                .stream_with_fallback(request.clone(), &mut renderer, cancel.clone())
                .await
                .map(|outcome| match outcome {
                    FallbackOutcome::Completed { model, attempts, .. } => Some((model, attempts)),
                    FallbackOutcome::Cancelled => None,
                })
        } else {
            drive(stream_generation(&transport, request.clone(), cancel.clone()), &mut renderer)
                .await
                .map(|outcome| match outcome {
                    StreamOutcome::Completed(_) => Some((request.model.clone(), 1)),
                    StreamOutcome::Cancelled => None,
                })
        };

        let err = match result {
            Ok(answered) => break Ok(answered),
            Err(err) => err,
        };
        let info = analyze_error(&err);
        let delay = if args.retry && info.can_retry {
            retry_strategy(&info).delay_for(attempt)
        } else {
            None
        };
        let Some(delay) = delay else {
            break Err(err);
        };

        attempt += 1;
        warn!(code = %info.code, attempt, ?delay, "retrying request");
        eprintln!(
            "{} retry {} in {:.1}s",
            "retrying:".yellow().bold(),
            attempt,
            delay.as_secs_f64()
        );
        tokio::select! {
            _ = cancel.cancelled() => break Ok(None),
            _ = tokio::time::sleep(delay) => {}
        }
    };
    ctrl_c.abort();

    match result {
        Ok(Some((model, attempts))) if model != request.model => {
            println!(
                "{}",
                format!("answered by {model} after {attempts} attempts").dimmed()
            );
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(err) => Err(anyhow!(err)),
    }
}

/// Prompt token count and the cost ceiling at the completion limit.
fn print_estimate(request: &StreamRequest, catalog: &ModelCatalog) {
    let prompt_tokens = match tokens::count_conversation_tokens(&request.messages, &request.model) {
        Ok(count) => count,
        Err(err) => {
            warn!(%err, "token count unavailable");
            return;
        }
    };
    let line = match catalog.get(&request.model) {
        Some(descriptor) => {
            let cost = tokens::estimate_cost(descriptor, prompt_tokens as u64, request.max_tokens as u64);
            format!(
                "Prompt: {} tokens, at most {} with {} completion tokens",
                prompt_tokens,
                tokens::format_cost(cost),
                request.max_tokens
            )
        }
        None => format!("Prompt: {} tokens", prompt_tokens),
    };
    println!("{}", line.dimmed());
}
