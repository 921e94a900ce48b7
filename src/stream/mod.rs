//! Streaming generation over a [`Transport`].
//!
//! [`stream_generation`] runs one attempt against one model: it resolves the
//! provider, opens the backend stream and yields text deltas as they are
//! decoded. Every stream ends with exactly one terminal item: a
//! [`StreamEvent::Completed`] carrying the full text, a
//! [`StreamEvent::Cancelled`], or an `Err`. Retrying and falling back to
//! other models is the caller's job (see [`crate::fallback`]).

mod error;
mod sse;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

use async_stream::stream;
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use error::StreamError;
pub use transport::{ByteStream, ChatPayload, HttpTransport, Transport};

use sse::SseDecoder;

use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::message::Message;
use crate::output::StreamSink;
use crate::provider::resolve_provider;

/// Inputs of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    /// Conversation so far. Must not be empty.
    pub messages: Vec<Message>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl StreamRequest {
    /// A request with default temperature and token limit.
    pub fn new(messages: Vec<Message>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// The same request aimed at another model.
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    fn payload(&self) -> ChatPayload {
        ChatPayload {
            messages: self.messages.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            max_completion_tokens: self.max_tokens,
            stream: true,
        }
    }
}

/// One item of a generation stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental text, in arrival order.
    Delta(String),
    /// Terminal: the stream finished; carries all deltas concatenated.
    Completed(String),
    /// Terminal: the caller cancelled before the stream finished.
    Cancelled,
}

/// How a driven stream ended, when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    Completed(String),
    Cancelled,
}

/// Streams one generation of `request.model` through `transport`.
///
/// The response body is owned by the returned stream and dropped on every
/// exit path, including cancellation through `cancel`.
pub fn stream_generation<'t, T>(
    transport: &'t T,
    request: StreamRequest,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<StreamEvent, StreamError>> + 't
where
    T: Transport + ?Sized,
{
    stream! {
        if request.messages.is_empty() {
            yield Err(StreamError::InvalidRequest("messages must not be empty".to_string()));
            return;
        }

        let session = Uuid::new_v4();
        let provider = resolve_provider(&request.model);
        let endpoint = provider.endpoint();
        info!(%session, model = %request.model, %provider, endpoint, "opening stream");

        let payload = request.payload();
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = transport.open(endpoint, &payload) => Some(result),
        };
        let mut body = match opened {
            None => {
                info!(%session, "stream cancelled before response");
                yield Ok(StreamEvent::Cancelled);
                return;
            }
            Some(Err(err)) => {
                warn!(%session, %err, "stream failed to open");
                yield Err(err);
                return;
            }
            Some(Ok(body)) => body,
        };

        let mut decoder = SseDecoder::new();
        let mut full_text = String::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                chunk = body.next() => Some(chunk),
            };
            match next {
                None => {
                    drop(body);
                    info!(%session, chars = full_text.len(), "stream cancelled");
                    yield Ok(StreamEvent::Cancelled);
                    return;
                }
                Some(None) => break,
                Some(Some(Err(err))) => {
                    warn!(%session, %err, "stream read failed");
                    yield Err(err);
                    return;
                }
                Some(Some(Ok(chunk))) => {
                    for delta in decoder.push(&chunk) {
                        full_text.push_str(&delta);
                        yield Ok(StreamEvent::Delta(delta));
                    }
                }
            }
        }
        drop(body);

        for delta in decoder.finish() {
            full_text.push_str(&delta);
            yield Ok(StreamEvent::Delta(delta));
        }
        debug!(%session, chars = full_text.len(), "stream completed");
        yield Ok(StreamEvent::Completed(full_text));
    }
}

/// Forwards a generation stream into `sink` callbacks.
///
/// Exactly one of `on_complete`, `on_cancelled` or `on_error` fires, after
/// every `on_chunk`.
pub async fn drive<S>(stream: S, sink: &mut dyn StreamSink) -> Result<StreamOutcome, StreamError>
where
    S: Stream<Item = Result<StreamEvent, StreamError>>,
{
    let mut stream = std::pin::pin!(stream);
    while let Some(item) = stream.next().await {
        match item {
            Ok(StreamEvent::Delta(text)) => sink.on_chunk(&text),
            Ok(StreamEvent::Completed(full_text)) => {
                sink.on_complete(&full_text);
                return Ok(StreamOutcome::Completed(full_text));
            }
            Ok(StreamEvent::Cancelled) => {
                sink.on_cancelled();
                return Ok(StreamOutcome::Cancelled);
            }
            Err(err) => {
                sink.on_error(&err);
                return Err(err);
            }
        }
    }
    let err = StreamError::Read("stream ended without a terminal event".to_string());
    sink.on_error(&err);
    Err(err)
}
