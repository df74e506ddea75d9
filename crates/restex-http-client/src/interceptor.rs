//! Request interceptors

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::error::HttpError;
use crate::request::RequestSummary;

/// Hook invoked on every outgoing request before it is sent
///
/// Interceptors run in registration order and receive the fully-merged
/// request summary. They may mutate it (the mutated summary is what gets
/// dispatched) or reject it by returning an error, in which case nothing is
/// sent and the request settles with that error.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Observe, mutate, or reject the outgoing request
    async fn before_send(&self, request: &mut RequestSummary) -> Result<(), HttpError>;
}

/// Interceptor that logs every outgoing request
#[derive(Debug, Default)]
pub struct LoggingInterceptor;

#[async_trait]
impl RequestInterceptor for LoggingInterceptor {
    async fn before_send(&self, request: &mut RequestSummary) -> Result<(), HttpError> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        tracing::info!("{} request sent to {} at {}", request.method, request.url, now_ms);
        Ok(())
    }
}
