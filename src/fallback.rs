//! Bounded model fallback around [`stream_generation`].
//!
//! A call makes at most three attempts, each with a different model:
//!
//! 1. the requested model;
//! 2. a substitute chosen from the failed model's family, the error
//!    classification and the task recommender;
//! 3. a universally available terminal model.
//!
//! The cascade never loops. If every attempt fails, the surfaced error
//! carries the primary failure, not the last one.

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::constants::{RECOMMEND_MIN_PROMPT_CHARS, STABLE_GPT4_FALLBACK, TERMINAL_FALLBACK_MODELS};
use crate::models::ModelCatalog;
use crate::output::StreamSink;
use crate::recommend::{analyze_prompt, best_model_for_task};
use crate::recovery::analyze_error;
use crate::stream::{stream_generation, StreamError, StreamEvent, StreamOutcome, StreamRequest, Transport};

/// How a cascade ended, when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    Completed {
        /// Model that produced `text`.
        model: String,
        text: String,
        /// Attempts made, including the successful one.
        attempts: usize,
    },
    Cancelled,
}

pub struct FallbackOrchestrator<'a, T: Transport + ?Sized> {
    transport: &'a T,
    catalog: &'a ModelCatalog,
}

impl<'a, T: Transport + ?Sized> FallbackOrchestrator<'a, T> {
    pub fn new(transport: &'a T, catalog: &'a ModelCatalog) -> Self {
        Self { transport, catalog }
    }

    /// Streams `request`, falling back to other models on failure.
    ///
    /// Deltas of every attempt reach `sink.on_chunk`; `sink.on_fallback`
    /// fires between attempts. Exactly one of `on_complete`, `on_cancelled`
    /// or `on_error` ends the call.
    pub async fn stream_with_fallback(
        &self,
        request: StreamRequest,
        sink: &mut dyn StreamSink,
        cancel: CancellationToken,
    ) -> Result<FallbackOutcome, StreamError> {
        let primary = request.model.clone();
        let mut tried = vec![primary.clone()];

        info!(model = %primary, "primary attempt");
        let original = match self.attempt(&request, sink, &cancel).await {
            Ok(outcome) => return Ok(finish(outcome, &primary, tried.len(), sink)),
            Err(err) => err,
        };
        warn!(model = %primary, err = %original, "primary model failed");

        let mut failed = primary.clone();
        let mut last_err = original.clone();
        for tier in [Tier::First, Tier::Terminal] {
            let candidates = match tier {
                Tier::First => self.first_fallback_candidates(&primary, &original, &request),
                Tier::Terminal => TERMINAL_FALLBACK_MODELS
                    .iter()
                    .copied()
                    .chain([STABLE_GPT4_FALLBACK])
                    .map(str::to_string)
                    .collect(),
            };
            let Some(next) = candidates.into_iter().find(|c| !tried.contains(c)) else {
                debug!(?tier, "no untried fallback model, skipping tier");
                continue;
            };

            info!(?tier, from = %failed, to = %next, "falling back");
            sink.on_fallback(&failed, &next, &last_err);
            tried.push(next.clone());

            match self.attempt(&request.with_model(&next), sink, &cancel).await {
                Ok(outcome) => return Ok(finish(outcome, &next, tried.len(), sink)),
                Err(err) => {
                    warn!(?tier, model = %next, %err, "fallback model failed");
                    failed = next;
                    last_err = err;
                }
            }
        }

        let err = StreamError::Exhausted {
            original: original.to_string(),
        };
        warn!(attempts = tried.len(), models = ?tried, "fallback cascade exhausted");
        sink.on_error(&err);
        Err(err)
    }

    /// One attempt. Forwards deltas but leaves terminal callbacks to the caller.
    async fn attempt(
        &self,
        request: &StreamRequest,
        sink: &mut dyn StreamSink,
        cancel: &CancellationToken,
    ) -> Result<StreamOutcome, StreamError> {
        let stream = stream_generation(self.transport, request.clone(), cancel.clone());
        let mut stream = std::pin::pin!(stream);
        while let Some(item) = stream.next().await {
            match item? {
                StreamEvent::Delta(text) => sink.on_chunk(&text),
                StreamEvent::Completed(text) => return Ok(StreamOutcome::Completed(text)),
                StreamEvent::Cancelled => return Ok(StreamOutcome::Cancelled),
            }
        }
        Err(StreamError::Read("stream ended without a terminal event".to_string()))
    }

    /// Substitutes for `failed`, most preferred first.
    fn first_fallback_candidates(
        &self,
        failed: &str,
        err: &StreamError,
        request: &StreamRequest,
    ) -> Vec<String> {
        let info = analyze_error(err);
        let default = info.fallback_model.unwrap_or(STABLE_GPT4_FALLBACK);

        let preferred = if is_gpt5_family(failed) || is_o_series(failed) {
            STABLE_GPT4_FALLBACK
        } else {
            let prompt = request
                .messages
                .last()
                .map(|m| m.text().trim())
                .unwrap_or_default();
            if prompt.chars().count() > RECOMMEND_MIN_PROMPT_CHARS {
                let pick = best_model_for_task(self.catalog, &analyze_prompt(prompt));
                debug!(code = %info.code, default, pick, "recommender consulted");
                if pick.contains("gpt-5") {
                    default
                } else {
                    pick
                }
            } else {
                default
            }
        };

        [preferred, default, STABLE_GPT4_FALLBACK]
            .into_iter()
            .chain(TERMINAL_FALLBACK_MODELS.iter().copied())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Tier {
    First,
    Terminal,
}

fn is_gpt5_family(model: &str) -> bool {
    model.contains("gpt-5") || model.starts_with("openai/gpt-5")
}

fn is_o_series(model: &str) -> bool {
    model.contains("o3-") || model.contains("o4-")
}

fn finish(
    outcome: StreamOutcome,
    model: &str,
    attempts: usize,
    sink: &mut dyn StreamSink,
) -> FallbackOutcome {
    match outcome {
        StreamOutcome::Completed(text) => {
            info!(model, attempts, "generation completed");
            sink.on_complete(&text);
            FallbackOutcome::Completed {
                model: model.to_string(),
                text,
                attempts,
            }
        }
        StreamOutcome::Cancelled => {
            info!(model, attempts, "generation cancelled");
            sink.on_cancelled();
            FallbackOutcome::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::stream::testing::{frame, RecordingSink, Scripted, ScriptedTransport, SinkEvent};
    use std::collections::HashSet;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn failure() -> StreamError {
        StreamError::Status {
            status: 500,
            body: "boom".into(),
        }
    }

    fn request(model: &str, prompt: &str) -> StreamRequest {
        StreamRequest::new(vec![Message::user(prompt)], model)
    }

    async fn run(
        transport: &ScriptedTransport,
        request: StreamRequest,
    ) -> (Result<FallbackOutcome, StreamError>, RecordingSink) {
        let catalog = ModelCatalog::popular();
        let orchestrator = FallbackOrchestrator::new(transport, &catalog);
        let mut sink = RecordingSink::default();
        let result = orchestrator
            .stream_with_fallback(request, &mut sink, CancellationToken::new())
            .await;
        (result, sink)
    }

    #[tokio::test]
    async fn test_primary_success_makes_one_call() {
        let transport = ScriptedTransport::new(Scripted::Chunks(vec![frame("hi")]));
        let (result, sink) = run(&transport, request("openai/gpt-4o-mini", "Say hi")).await;
        assert_eq!(
            result,
            Ok(FallbackOutcome::Completed {
                model: "openai/gpt-4o-mini".into(),
                text: "hi".into(),
                attempts: 1,
            })
        );
        assert_eq!(transport.models().len(), 1);
        assert_eq!(
            sink.events,
            vec![SinkEvent::Chunk("hi".into()), SinkEvent::Complete("hi".into())]
        );
    }

    #[tokio::test]
    async fn test_always_failing_makes_three_distinct_calls() {
        let prompts = ["Say hi", "Write a Python function to sort a list"];
        let models = [
            "openai/gpt-4o-mini",
            "openai/gpt-4o",
            "openai/gpt-5",
            "openai/o3-mini",
            "google/gemini-2.0-flash-001",
            "mistralai/mistral-large-2411",
        ];
        for prompt in prompts {
            for model in models {
                let transport = ScriptedTransport::failing(failure());
                let (result, sink) = run(&transport, request(model, prompt)).await;

                let called = transport.models();
                assert_eq!(called.len(), 3, "{model}: {called:?}");
                let distinct: HashSet<_> = called.iter().collect();
                assert_eq!(distinct.len(), 3, "{model}: {called:?}");
                assert_eq!(called[0], model);

                assert_eq!(
                    result,
                    Err(StreamError::Exhausted {
                        original: failure().to_string()
                    })
                );
                assert_eq!(sink.terminal_count(), 1);
                assert!(matches!(sink.events.last(), Some(SinkEvent::Error(_))));
            }
        }
    }

    #[tokio::test]
    async fn test_exhausted_error_keeps_primary_message() {
        let transport = ScriptedTransport::failing(StreamError::Timeout)
            .respond("openai/gpt-4o-mini", Scripted::Fail(failure()))
            .respond(
                "openai/gpt-4o",
                Scripted::Fail(StreamError::Network("dns".into())),
            );
        let (result, _) = run(&transport, request("openai/gpt-4o-mini", "Say hi")).await;
        let Err(err) = result else {
            panic!("expected failure");
        };
        assert_eq!(err.to_string(), "all fallback models failed: HTTP 500: boom");
    }

    #[tokio::test]
    async fn test_gpt5_falls_back_to_stable_gpt4() {
        let transport = ScriptedTransport::failing(failure())
            .respond(STABLE_GPT4_FALLBACK, Scripted::Chunks(vec![frame("ok")]));
        let (result, sink) = run(
            &transport,
            request("openai/gpt-5-preview", "Write a Python function to sort a list"),
        )
        .await;
        assert_eq!(transport.models(), vec!["openai/gpt-5-preview", STABLE_GPT4_FALLBACK]);
        assert!(matches!(
            result,
            Ok(FallbackOutcome::Completed { ref model, attempts: 2, .. }) if model == STABLE_GPT4_FALLBACK
        ));
        assert_eq!(
            sink.events[0],
            SinkEvent::Fallback {
                failed: "openai/gpt-5-preview".into(),
                next: STABLE_GPT4_FALLBACK.into(),
            }
        );
    }

    #[tokio::test]
    async fn test_o_series_falls_back_to_stable_gpt4() {
        let transport = ScriptedTransport::failing(failure());
        let (result, _) = run(&transport, request("openai/o4-mini", "Say hi")).await;
        assert!(matches!(result, Err(StreamError::Exhausted { .. })));
        assert_eq!(transport.models()[1], STABLE_GPT4_FALLBACK);
    }

    #[tokio::test]
    async fn test_short_prompt_uses_classifier_default() {
        // 503 classifies as model_offline, whose default is gpt-4o-mini.
        let err = StreamError::Status {
            status: 503,
            body: "unavailable".into(),
        };
        let transport = ScriptedTransport::failing(err);
        let (result, _) = run(&transport, request("mistralai/mistral-large-2411", "  hi there  ")).await;
        assert!(matches!(result, Err(StreamError::Exhausted { .. })));
        assert_eq!(transport.models()[1], "openai/gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_only_latest_message_feeds_the_recommender() {
        let messages = vec![
            Message::user("Write a Python function to sort a list"),
            Message::assistant("def sort_list(items): ..."),
            Message::user("thanks!"),
        ];
        let transport = ScriptedTransport::failing(failure());
        let (result, _) = run(&transport, StreamRequest::new(messages, "mistralai/mistral-large-2411")).await;
        assert!(matches!(result, Err(StreamError::Exhausted { .. })));
        // "HTTP 500: boom" is unknown, whose default is gpt-4o-mini.
        assert_eq!(transport.models()[1], "openai/gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_long_prompt_prefers_recommender_pick() {
        let prompt = "Write a Python function to sort a list";
        let catalog = ModelCatalog::popular();
        let pick = best_model_for_task(&catalog, &analyze_prompt(prompt)).to_string();

        let transport = ScriptedTransport::failing(failure())
            .respond(&pick, Scripted::Chunks(vec![frame("def sort")]));
        let (result, _) = run(&transport, request("mistralai/mistral-large-2411", prompt)).await;
        assert_eq!(transport.models()[1], pick);
        assert!(matches!(result, Ok(FallbackOutcome::Completed { attempts: 2, .. })));
    }

    #[tokio::test]
    async fn test_partial_output_then_fallback_is_reported() {
        let transport = ScriptedTransport::failing(failure())
            .respond(
                "openai/gpt-4o-mini",
                Scripted::BreakAfter(vec![frame("par")], StreamError::Read("reset".into())),
            )
            .respond("openai/gpt-4o", Scripted::Chunks(vec![frame("full")]));
        let (result, sink) = run(&transport, request("openai/gpt-4o-mini", "Say hi")).await;
        assert!(matches!(result, Ok(FallbackOutcome::Completed { ref text, .. }) if text == "full"));
        assert_eq!(
            sink.events,
            vec![
                SinkEvent::Chunk("par".into()),
                SinkEvent::Fallback {
                    failed: "openai/gpt-4o-mini".into(),
                    next: "openai/gpt-4o".into(),
                },
                SinkEvent::Chunk("full".into()),
                SinkEvent::Complete("full".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancellation_stops_the_cascade() {
        let dropped = Arc::new(AtomicBool::new(false));
        let transport = ScriptedTransport::new(Scripted::Hang(vec![frame("A")], dropped));
        let catalog = ModelCatalog::popular();
        let orchestrator = FallbackOrchestrator::new(&transport, &catalog);
        let cancel = CancellationToken::new();
        let mut sink = RecordingSink::default();

        let canceller = {
            let cancel = cancel.clone();
            async move {
                tokio::task::yield_now().await;
                cancel.cancel();
            }
        };
        let (result, _) = tokio::join!(
            orchestrator.stream_with_fallback(request("openai/gpt-4o", "Say hi"), &mut sink, cancel.clone()),
            canceller,
        );

        assert_eq!(result, Ok(FallbackOutcome::Cancelled));
        assert_eq!(transport.models(), vec!["openai/gpt-4o"]);
        assert_eq!(sink.events.last(), Some(&SinkEvent::Cancelled));
        assert_eq!(sink.terminal_count(), 1);
    }
}
