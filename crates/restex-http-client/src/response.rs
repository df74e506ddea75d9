//! Response and outcome types

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::HttpError;
use crate::request::RequestSummary;

/// A settled successful response
///
/// Headers use a `BTreeMap` so renders are deterministic. The body has
/// already been run through the transform chain. The request summary echoes
/// the exact configuration the request was dispatched with.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Value,
    request: RequestSummary,
}

impl HttpResponse {
    /// Assemble a settled response
    pub fn new(
        status: u16,
        headers: BTreeMap<String, String>,
        body: Value,
        request: RequestSummary,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            request,
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response headers
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Transformed response body
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The request configuration this response settled from
    pub fn request(&self) -> &RequestSummary {
        &self.request
    }
}

/// Terminal tagged result of an action
#[derive(Debug)]
pub enum Outcome {
    /// The request settled with a success status
    Success(HttpResponse),
    /// The request failed (server error, no response, or setup failure)
    Failure(HttpError),
    /// Settlement was pre-empted by a cancellation signal
    Cancelled(String),
}

impl From<Result<HttpResponse, HttpError>> for Outcome {
    fn from(result: Result<HttpResponse, HttpError>) -> Self {
        match result {
            Ok(response) => Outcome::Success(response),
            Err(HttpError::Cancelled(reason)) => Outcome::Cancelled(reason),
            Err(err) => Outcome::Failure(err),
        }
    }
}
