//! In-memory transports and sinks shared by the pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_stream::stream;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use super::{ByteStream, ChatPayload, StreamError, Transport};
use crate::output::StreamSink;

/// What a scripted transport answers for one call.
#[derive(Clone)]
pub enum Scripted {
    /// A successful response delivering these reads, in order.
    Chunks(Vec<Vec<u8>>),
    /// `open` fails.
    Fail(StreamError),
    /// The response opens, delivers the reads, then fails mid-stream.
    BreakAfter(Vec<Vec<u8>>, StreamError),
    /// The response delivers the reads, then never finishes. The flag is set
    /// once the body is dropped.
    Hang(Vec<Vec<u8>>, Arc<AtomicBool>),
}

/// SSE frame for one delta.
pub fn frame(text: &str) -> Vec<u8> {
    format!("data: {}\n\n", serde_json::json!({"choices": [{"delta": {"content": text}}]})).into_bytes()
}

/// Records each call and answers per model, falling back to a default.
pub struct ScriptedTransport {
    by_model: HashMap<String, Scripted>,
    default: Scripted,
    calls: Mutex<Vec<(String, ChatPayload)>>,
}

impl ScriptedTransport {
    pub fn new(default: Scripted) -> Self {
        Self {
            by_model: HashMap::new(),
            default,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every model fails to open with `err`.
    pub fn failing(err: StreamError) -> Self {
        Self::new(Scripted::Fail(err))
    }

    pub fn respond(mut self, model: &str, answer: Scripted) -> Self {
        self.by_model.insert(model.to_string(), answer);
        self
    }

    /// `(endpoint, model)` of every call so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(endpoint, payload)| (endpoint.clone(), payload.model.clone()))
            .collect()
    }

    pub fn payloads(&self) -> Vec<ChatPayload> {
        self.calls.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn models(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, model)| model).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn open(&self, endpoint: &str, payload: &ChatPayload) -> Result<ByteStream, StreamError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), payload.clone()));
        let answer = self
            .by_model
            .get(&payload.model)
            .unwrap_or(&self.default)
            .clone();
        match answer {
            Scripted::Chunks(reads) => Ok(body_of(reads, None)),
            Scripted::Fail(err) => Err(err),
            Scripted::BreakAfter(reads, err) => Ok(body_of(reads, Some(err))),
            Scripted::Hang(reads, dropped) => Ok(hanging_body(reads, dropped)),
        }
    }
}

fn body_of(reads: Vec<Vec<u8>>, error: Option<StreamError>) -> ByteStream {
    let items: Vec<Result<Bytes, StreamError>> = reads
        .into_iter()
        .map(|read| Ok(Bytes::from(read)))
        .chain(error.map(Err))
        .collect();
    futures::stream::iter(items).boxed()
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn hanging_body(reads: Vec<Vec<u8>>, dropped: Arc<AtomicBool>) -> ByteStream {
    let guard = DropFlag(dropped);
    stream! {
        let _guard = guard;
        for read in reads {
            yield Ok::<_, StreamError>(Bytes::from(read));
        }
        futures::future::pending::<()>().await;
    }
    .boxed()
}

/// Sink events in the order they fired.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Chunk(String),
    Complete(String),
    Error(String),
    Cancelled,
    Fallback { failed: String, next: String },
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    /// Number of `Complete`, `Error` and `Cancelled` events.
    pub fn terminal_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Complete(_) | SinkEvent::Error(_) | SinkEvent::Cancelled))
            .count()
    }
}

impl StreamSink for RecordingSink {
    fn on_chunk(&mut self, text: &str) {
        self.events.push(SinkEvent::Chunk(text.to_string()));
    }

    fn on_complete(&mut self, full_text: &str) {
        self.events.push(SinkEvent::Complete(full_text.to_string()));
    }

    fn on_error(&mut self, err: &StreamError) {
        self.events.push(SinkEvent::Error(err.to_string()));
    }

    fn on_cancelled(&mut self) {
        self.events.push(SinkEvent::Cancelled);
    }

    fn on_fallback(&mut self, failed: &str, next: &str, _err: &StreamError) {
        self.events.push(SinkEvent::Fallback {
            failed: failed.to_string(),
            next: next.to_string(),
        });
    }
}
