//! Incremental Server-Sent-Events decoding.
//!
//! Network reads do not respect line or UTF-8 boundaries. [`SseDecoder`]
//! keeps the partial last line (and any incomplete multi-byte sequence)
//! until the next read completes it, then extracts text deltas from every
//! complete `data: ` line.

use serde_json::Value;
use tracing::trace;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Decoded text after the last newline seen.
    carry: String,
    /// Undecoded bytes of a multi-byte character split across reads.
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one network read and returns the deltas it completed, in order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let text = self.decode(bytes);
        self.carry.push_str(&text);

        let Some(last_newline) = self.carry.rfind('\n') else {
            return Vec::new();
        };
        let complete: String = self.carry.drain(..=last_newline).collect();
        process_lines(complete.split('\n'))
    }

    /// Flushes whatever is left once the byte stream has ended.
    pub fn finish(&mut self) -> Vec<String> {
        let mut rest = std::mem::take(&mut self.carry);
        rest.push_str(&String::from_utf8_lossy(&std::mem::take(&mut self.pending)));
        process_lines(std::iter::once(rest.as_str()))
    }

    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        // Step over invalid bytes; only a truncated sequence at the very end
        // waits for the rest of it.
        let mut checked = 0;
        let keep = loop {
            match std::str::from_utf8(&self.pending[checked..]) {
                Ok(_) => break 0,
                Err(e) => match e.error_len() {
                    Some(invalid) => checked += e.valid_up_to() + invalid,
                    None => break self.pending.len() - checked - e.valid_up_to(),
                },
            }
        };
        let tail = self.pending.split_off(self.pending.len() - keep);
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending = tail;
        text
    }
}

/// Extracts deltas from complete lines. `[DONE]` ends processing of this batch.
fn process_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut deltas = Vec::new();
    for line in lines {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            break;
        }
        match serde_json::from_str::<Value>(payload) {
            Ok(value) => deltas.extend(extract_delta(&value)),
            Err(err) => trace!(%err, "discarding unparseable event payload"),
        }
    }
    deltas
}

/// First non-empty text among `choices[0].delta.content`,
/// `choices[0].message.content` and a top-level `content`.
pub fn extract_delta(value: &Value) -> Option<String> {
    let choice = value.get("choices").and_then(|c| c.get(0));
    [
        choice.and_then(|c| c.pointer("/delta/content")),
        choice.and_then(|c| c.pointer("/message/content")),
        value.get("content"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .find(|text| !text.is_empty())
    .map(str::to_string)
}
