//! HTTP client abstraction for restex
//!
//! This crate wraps a reqwest client behind a small, testable surface:
//! immutable per-client configuration, per-request overrides, an interceptor
//! chain, a response transform chain, and explicit cancellation. Every
//! request settles into either an [`HttpResponse`] or a classified
//! [`HttpError`]; [`Outcome`] tags the settlement for rendering.
//!
//! # Example
//!
//! ```no_run
//! use restex_http_client::{HttpClient, HttpError};
//! use url::Url;
//!
//! async fn example() -> Result<(), HttpError> {
//!     let base = Url::parse("https://jsonplaceholder.typicode.com").expect("static url");
//!     let client = HttpClient::builder().base_url(base).build()?;
//!
//!     let response = client.get("/todos").query("_limit", "5").send().await?;
//!     println!("{}", response.status());
//!     Ok(())
//! }
//! ```

mod cancel;
mod client;
mod config;
mod error;
mod interceptor;
mod request;
mod response;
mod transform;

pub use cancel::CancelHandle;
pub use client::{HttpClient, HttpClientBuilder};
pub use config::ClientConfig;
pub use error::HttpError;
pub use interceptor::{LoggingInterceptor, RequestInterceptor};
pub use request::{RequestBuilder, RequestSummary};
pub use response::{HttpResponse, Outcome};
pub use transform::{ResponseTransform, TransformChain};
