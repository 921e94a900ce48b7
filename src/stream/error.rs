//! Failure of a single stream attempt or of a whole fallback cascade.
//!
//! The display strings are what [`crate::recovery::analyze_error`] sees, so
//! they keep the status code and the words the classifier keys on.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StreamError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be sent.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timeout (408)")]
    Timeout,

    /// The response body failed mid-stream.
    #[error("connection interrupted while reading stream: {0}")]
    Read(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Every model in the fallback cascade failed. Carries the primary failure.
    #[error("all fallback models failed: {original}")]
    Exhausted { original: String },
}

impl StreamError {
    /// Maps a send-side reqwest failure.
    pub fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Maps a failure while reading the response body.
    pub fn from_read(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Read(err.to_string())
        }
    }
}
