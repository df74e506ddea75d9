//! Request cancellation

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

const DEFAULT_REASON: &str = "request cancelled";

/// Handle for cancelling one in-flight request
///
/// Clones share the same signal. The first call to [`CancelHandle::cancel`]
/// wins; later reasons are discarded. A handle that is cancelled before its
/// request is dispatched settles the request as cancelled without sending
/// anything; a handle cancelled after the response has settled has no
/// effect.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    reason: Arc<OnceLock<String>>,
}

impl CancelHandle {
    /// Create a new, unsignalled handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation with a reason
    pub fn cancel(&self, reason: impl Into<String>) {
        let _ = self.reason.set(reason.into());
        self.token.cancel();
    }

    /// Whether cancellation has been signalled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation is signalled
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// The reason given when the handle was cancelled
    pub fn reason(&self) -> String {
        self.reason
            .get()
            .cloned()
            .unwrap_or_else(|| DEFAULT_REASON.to_string())
    }
}
