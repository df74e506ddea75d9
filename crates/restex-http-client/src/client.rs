//! HTTP client wrapper

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::HttpError;
use crate::interceptor::RequestInterceptor;
use crate::request::{RequestBuilder, RequestSummary};
use crate::response::HttpResponse;
use crate::transform::TransformChain;

/// HTTP client wrapper
///
/// Wraps a `reqwest::Client` together with an immutable [`ClientConfig`]
/// snapshot, an interceptor chain, and a default transform chain. Cloning is
/// cheap; clones share the connection pool and configuration. A
/// pre-configured "instance" is simply another client built with a fixed
/// base URL.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: Arc<ClientConfig>,
    interceptors: Arc<Vec<Box<dyn RequestInterceptor>>>,
    transforms: TransformChain,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("interceptors", &self.interceptors.len())
            .field("transforms", &self.transforms)
            .finish_non_exhaustive()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            inner: reqwest::Client::new(),
            config: Arc::new(ClientConfig::default()),
            interceptors: Arc::new(Vec::new()),
            transforms: TransformChain::new(),
        }
    }
}

impl HttpClient {
    /// Create a new client with default settings and no base URL
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new client builder
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// The configuration snapshot this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn base_transforms(&self) -> &TransformChain {
        &self.transforms
    }

    /// GET request builder
    pub fn get(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), reqwest::Method::GET, path)
    }

    /// POST request builder
    pub fn post(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), reqwest::Method::POST, path)
    }

    /// PUT request builder
    pub fn put(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), reqwest::Method::PUT, path)
    }

    /// PATCH request builder
    pub fn patch(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), reqwest::Method::PATCH, path)
    }

    /// DELETE request builder
    pub fn delete(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), reqwest::Method::DELETE, path)
    }

    /// Dispatch a built request
    ///
    /// Order of operations: merge configuration into a [`RequestSummary`],
    /// run the interceptor chain (first rejection aborts, nothing is sent),
    /// then race the send against the cancellation handle if one is bound.
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
    ) -> Result<HttpResponse, HttpError> {
        if let Some(detail) = request.body_error {
            return Err(HttpError::Serialization(detail));
        }

        let url = self.config.resolve_url(&request.path)?;
        let timeout = request.timeout.or(self.config.timeout);

        let mut summary = RequestSummary {
            method: request.method.as_str().to_string(),
            url: url.to_string(),
            query: request.query,
            headers: self.config.merged_headers(&request.headers),
            body: request.body,
            timeout_ms: timeout.map(|t| t.as_millis() as u64),
        };

        for interceptor in self.interceptors.iter() {
            interceptor.before_send(&mut summary).await?;
        }

        match &request.cancel {
            Some(handle) => {
                // A signal raised before dispatch settles the request
                // without sending anything.
                if handle.is_cancelled() {
                    return Err(HttpError::Cancelled(handle.reason()));
                }

                let send = self.dispatch(&summary, &request.transforms);
                tokio::select! {
                    _ = handle.cancelled() => Err(HttpError::Cancelled(handle.reason())),
                    result = send => result,
                }
            }
            None => self.dispatch(&summary, &request.transforms).await,
        }
    }

    /// Send the summarized request and read the response to settlement
    async fn dispatch(
        &self,
        summary: &RequestSummary,
        transforms: &TransformChain,
    ) -> Result<HttpResponse, HttpError> {
        // The summary is re-parsed here so interceptor mutations take
        // effect; an interceptor that produced an invalid method or URL
        // surfaces as a setup error.
        let method = reqwest::Method::from_bytes(summary.method.as_bytes())
            .map_err(|e| HttpError::Setup(e.to_string()))?;
        let url = Url::parse(&summary.url).map_err(|e| HttpError::Setup(e.to_string()))?;

        let mut builder = self.inner.request(method, url);

        if !summary.query.is_empty() {
            builder = builder.query(&summary.query);
        }
        for (key, value) in &summary.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &summary.body {
            builder = builder.json(body);
        }
        if let Some(ms) = summary.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::classify(e, summary))?;

        let status = response.status().as_u16();
        let headers = header_map_to_btree(response.headers());
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::classify(e, summary))?;
        let body = transforms.apply(&text);

        if !(200..300).contains(&status) {
            tracing::debug!("{} {} answered {}", summary.method, summary.url, status);
            return Err(HttpError::Status {
                status,
                headers,
                body,
            });
        }

        Ok(HttpResponse::new(status, headers, body, summary.clone()))
    }
}

/// Repeated header names (e.g. multiple `set-cookie`) join comma-separated;
/// non-ASCII values render lossily rather than disappearing.
fn header_map_to_btree(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (name, value) in headers.iter() {
        let rendered = match value.to_str() {
            Ok(text) => text.to_string(),
            Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };
        match map.entry(name.as_str().to_string()) {
            Entry::Occupied(mut entry) => {
                let existing: &mut String = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(&rendered);
            }
            Entry::Vacant(entry) => {
                entry.insert(rendered);
            }
        }
    }
    map
}

/// Builder for a configured [`HttpClient`]
#[derive(Default)]
pub struct HttpClientBuilder {
    base_url: Option<Url>,
    default_headers: BTreeMap<String, String>,
    timeout: Option<Duration>,
    interceptors: Vec<Box<dyn RequestInterceptor>>,
    transforms: TransformChain,
}

impl fmt::Debug for HttpClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("timeout", &self.timeout)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl HttpClientBuilder {
    /// Set the base URL request paths resolve against
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Add a header sent with every request
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the default request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register an interceptor; interceptors run in registration order
    pub fn interceptor<I: RequestInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Append a default response transform applied to every request
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transforms.push(transform);
        self
    }

    /// Build the client; the configuration is immutable from here on
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let inner = reqwest::Client::builder()
            .build()
            .map_err(|e| HttpError::Setup(e.to_string()))?;

        Ok(HttpClient {
            inner,
            config: Arc::new(ClientConfig {
                base_url: self.base_url,
                default_headers: self.default_headers,
                timeout: self.timeout,
            }),
            interceptors: Arc::new(self.interceptors),
            transforms: self.transforms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = HttpClient::new();
        assert!(client.config().base_url.is_none());
    }

    #[test]
    fn test_builder_build() {
        let result = HttpClientBuilder::default().build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_captures_config_snapshot() {
        let base = Url::parse("https://api.example.com").expect("valid url");
        let client = HttpClient::builder()
            .base_url(base.clone())
            .default_header("X-Auth-Token", "token-value")
            .timeout(Duration::from_secs(5))
            .build()
            .expect("client should build");

        let config = client.config();
        assert_eq!(config.base_url.as_ref(), Some(&base));
        assert_eq!(
            config.default_headers.get("X-Auth-Token").map(String::as_str),
            Some("token-value")
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_header_map_joins_repeated_values() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.append(
            "set-cookie",
            reqwest::header::HeaderValue::from_static("a=1"),
        );
        headers.append(
            "set-cookie",
            reqwest::header::HeaderValue::from_static("b=2"),
        );

        let map = header_map_to_btree(&headers);
        assert_eq!(map.get("set-cookie").map(String::as_str), Some("a=1, b=2"));
    }

    #[test]
    fn test_header_map_renders_non_ascii_value_lossily() {
        let mut headers = reqwest::header::HeaderMap::new();
        let value = reqwest::header::HeaderValue::from_bytes(b"caf\xe9")
            .expect("opaque bytes are a valid header value");
        headers.insert("x-flavor", value);

        let map = header_map_to_btree(&headers);
        assert_eq!(
            map.get("x-flavor").map(String::as_str),
            Some("caf\u{fffd}")
        );
    }

    #[test]
    fn test_clones_share_config() {
        let client = HttpClient::builder()
            .default_header("Accept", "application/json")
            .build()
            .expect("client should build");
        let clone = client.clone();
        assert_eq!(
            clone.config().default_headers.get("Accept"),
            client.config().default_headers.get("Accept")
        );
    }
}
