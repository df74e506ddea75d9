//! Client configuration

use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::error::HttpError;

/// Immutable configuration snapshot for a client
///
/// Captured once when the client is built. Per-request values merge over
/// these defaults at dispatch time; the request value wins on collision.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL request paths are resolved against
    pub base_url: Option<Url>,
    /// Headers sent with every request unless overridden per request
    pub default_headers: BTreeMap<String, String>,
    /// Default request timeout
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Merge per-request headers over the defaults, request value winning
    pub fn merged_headers(
        &self,
        overrides: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut merged = self.default_headers.clone();
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Resolve a request path against the base URL
    ///
    /// An absolute URL in the request wins over the configured base.
    pub fn resolve_url(&self, path: &str) -> Result<Url, HttpError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|e| HttpError::Setup(e.to_string()));
        }

        match &self.base_url {
            Some(base) => base
                .join(path)
                .map_err(|e| HttpError::Setup(e.to_string())),
            None => Err(HttpError::Setup(format!(
                "relative path {} with no base URL configured",
                path
            ))),
        }
    }
}
