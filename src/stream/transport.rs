//! Byte-stream transports for chat requests.
//!
//! [`Transport`] is the seam between the streaming pipeline and the network:
//! it sends one request and hands back the raw response body. The
//! production implementation, [`HttpTransport`], posts to the backend's
//! per-provider edge functions with reqwest.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::StreamError;
use crate::constants::FUNCTIONS_PATH;
use crate::message::Message;

/// Raw response body, read incrementally.
pub type ByteStream = BoxStream<'static, Result<Bytes, StreamError>>;

/// JSON body of one stream request.
///
/// `max_tokens` and `max_completion_tokens` always carry the same value;
/// providers disagree on which one they read.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatPayload {
    pub messages: Vec<Message>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_completion_tokens: u32,
    pub stream: bool,
}

/// Sends a chat request to a named backend endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a stream. Non-2xx responses are errors; no retries happen here.
    async fn open(&self, endpoint: &str, payload: &ChatPayload) -> Result<ByteStream, StreamError>;
}

/// Longest response body kept in a status error.
const MAX_ERROR_BODY: usize = 500;

/// reqwest-backed transport for the backend's edge functions.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
    /// Replacement endpoint names, keyed by the default name.
    endpoints: HashMap<String, String>,
}

impl HttpTransport {
    /// Creates a transport for `base_url` authenticating with `auth_token`.
    ///
    /// `timeout` bounds connecting and each wait for data, not the whole
    /// response, so a long generation that keeps streaming is never cut off.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, auth_token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
            endpoints: HashMap::new(),
        })
    }

    /// Posts to the given endpoint names instead of the defaults they are keyed by.
    pub fn with_endpoint_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.endpoints = overrides;
        self
    }

    fn url_for(&self, endpoint: &str) -> String {
        let endpoint = self.endpoints.get(endpoint).map_or(endpoint, String::as_str);
        format!("{}/{}/{}", self.base_url, FUNCTIONS_PATH, endpoint)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(&self, endpoint: &str, payload: &ChatPayload) -> Result<ByteStream, StreamError> {
        let url = self.url_for(endpoint);
        debug!(%url, model = %payload.model, "posting stream request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.auth_token)
            .json(payload)
            .send()
            .await
            .map_err(StreamError::from_send)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "stream request rejected");
            return Err(StreamError::Status {
                status: status.as_u16(),
                body: truncate_for_error(&body, MAX_ERROR_BODY),
            });
        }

        Ok(resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(StreamError::from_read))
            .boxed())
    }
}

fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
