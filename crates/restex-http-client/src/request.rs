//! Request builder and the outgoing request summary

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cancel::CancelHandle;
use crate::client::HttpClient;
use crate::error::HttpError;
use crate::response::{HttpResponse, Outcome};
use crate::transform::TransformChain;

/// Serializable echo of a fully-merged outgoing request
///
/// This is what interceptors see (and may mutate) before dispatch, what the
/// renderer shows as the request's config, and what a
/// [`HttpError::NoResponse`] carries so the failed request can still be
/// inspected.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    /// HTTP method
    pub method: String,
    /// Resolved absolute URL, without query parameters
    pub url: String,
    /// Query parameters appended at dispatch
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
    /// Headers after merging defaults and per-request overrides
    pub headers: BTreeMap<String, String>,
    /// JSON request body, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Effective timeout in milliseconds, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Builder for a single request
///
/// Obtained from the verb methods on [`HttpClient`]; consumed by
/// [`RequestBuilder::send`] or [`RequestBuilder::outcome`].
pub struct RequestBuilder {
    pub(crate) client: HttpClient,
    pub(crate) method: reqwest::Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) body: Option<Value>,
    pub(crate) body_error: Option<String>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) transforms: TransformChain,
    pub(crate) cancel: Option<CancelHandle>,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: reqwest::Method, path: &str) -> Self {
        let transforms = client.base_transforms().clone();
        Self {
            client,
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            body_error: None,
            timeout: None,
            transforms,
            cancel: None,
        }
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a per-request header, overriding any default with the same name
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the JSON request body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(err) => self.body_error = Some(err.to_string()),
        }
        self
    }

    /// Set a per-request timeout, overriding the client default
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append a response transform to run after the default chain
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transforms.push(transform);
        self
    }

    /// Bind this request to a cancellation handle
    pub fn cancel_handle(mut self, handle: &CancelHandle) -> Self {
        self.cancel = Some(handle.clone());
        self
    }

    /// Dispatch the request and settle into a response or an error
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        let client = self.client.clone();
        client.execute(self).await
    }

    /// Dispatch the request and settle into a tagged [`Outcome`]
    pub async fn outcome(self) -> Outcome {
        self.send().await.into()
    }
}
