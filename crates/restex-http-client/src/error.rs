//! HTTP error types

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::request::RequestSummary;

/// Errors a request can settle into
///
/// The variants mirror the three places a request can die: the server
/// answered with a non-success status, the request went out but nothing came
/// back, or the request could not even be constructed. Cancellation is its
/// own variant so callers can branch on it without string matching.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server responded with a non-success status
    #[error("HTTP error ({status})")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response headers
        headers: BTreeMap<String, String>,
        /// Response body, run through the transform chain
        body: Value,
    },
    /// The request was sent but no response was received
    #[error("No response received: {detail}")]
    NoResponse {
        /// The outgoing request that never settled
        request: RequestSummary,
        /// Transport-level detail (connect failure, timeout, ...)
        detail: String,
    },
    /// The request could not be constructed or sent
    #[error("Request setup error: {0}")]
    Setup(String),
    /// Settlement was pre-empted by an explicit cancellation signal
    #[error("Request cancelled: {0}")]
    Cancelled(String),
    /// Body serialization or deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HttpError {
    /// Whether this error is a cancellation settlement
    pub fn is_cancellation(&self) -> bool {
        matches!(self, HttpError::Cancelled(_))
    }

    /// Classify a reqwest send-side error against the request it belongs to
    pub(crate) fn classify(err: reqwest::Error, request: &RequestSummary) -> Self {
        if err.is_builder() {
            HttpError::Setup(err.to_string())
        } else if err.is_decode() || err.is_body() {
            HttpError::Serialization(err.to_string())
        } else {
            // Covers connect failures, timeouts and anything else where the
            // request left but no usable response arrived.
            HttpError::NoResponse {
                request: request.clone(),
                detail: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}
