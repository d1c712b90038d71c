//! Per-request observation hooks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// What happened to a single HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// HTTP method.
    pub method: String,
    /// Request path, e.g. `/api/stats`.
    pub endpoint: String,
    /// Status code, absent when no response arrived.
    pub status: Option<u16>,
    /// Time from send to body read.
    pub elapsed: Duration,
    /// True when a 2xx response was read completely.
    pub success: bool,
}

type OutcomeCallback = Arc<dyn Fn(&RequestOutcome) + Send + Sync>;

/// Callbacks invoked after every request the client sends.
#[derive(Clone, Default)]
pub struct ApiClientHooks {
    on_request: Option<OutcomeCallback>,
}

impl ApiClientHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback receiving every request outcome.
    pub fn on_request<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RequestOutcome) + Send + Sync + 'static,
    {
        self.on_request = Some(Arc::new(callback));
        self
    }

    pub(crate) fn notify(&self, outcome: RequestOutcome) {
        if let Some(callback) = &self.on_request {
            callback(&outcome);
        }
    }
}

impl fmt::Debug for ApiClientHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientHooks")
            .field("on_request", &self.on_request.is_some())
            .finish()
    }
}
