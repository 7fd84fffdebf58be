//! In-memory transport.

use crate::canned::CannedResponse;
use halforms_client::{clone_request, HalError, Request, ResponseFuture, Transport};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Transport answering from canned responses and recording every request.
///
/// Responses are picked by request path; paths without a route get the
/// fallback response. Clones share routes and recorded requests.
///
/// # Example
///
/// ```
/// use halforms_test::{CannedResponse, StubTransport};
/// use http::StatusCode;
/// use serde_json::json;
///
/// let transport = StubTransport::new()
///     .with_route("/orders", CannedResponse::ok(&json!({ "total": 2 })))
///     .with_fallback(CannedResponse::empty(StatusCode::NOT_FOUND));
/// assert_eq!(transport.calls(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    inner: Arc<StubInner>,
}

#[derive(Debug, Default)]
struct StubInner {
    fallback: Mutex<CannedResponse>,
    routes: Mutex<HashMap<String, CannedResponse>>,
    requests: Mutex<Vec<Request>>,
}

impl StubTransport {
    /// Creates a transport answering `200 {}` to everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport answering `response` to everything.
    pub fn always(response: CannedResponse) -> Self {
        Self::new().with_fallback(response)
    }

    /// Sets the response for paths without a route.
    #[must_use]
    pub fn with_fallback(self, response: CannedResponse) -> Self {
        *self.inner.fallback.lock() = response;
        self
    }

    /// Answers `response` to requests for `path`.
    #[must_use]
    pub fn with_route(self, path: impl Into<String>, response: CannedResponse) -> Self {
        self.route(path, response);
        self
    }

    /// Adds or replaces a route on a shared transport.
    pub fn route(&self, path: impl Into<String>, response: CannedResponse) {
        self.inner.routes.lock().insert(path.into(), response);
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.inner.requests.lock().len()
    }

    /// Copies of every request received, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.inner.requests.lock().iter().map(clone_request).collect()
    }

    /// Copy of the latest request.
    pub fn last_request(&self) -> Option<Request> {
        self.inner.requests.lock().last().map(clone_request)
    }

    /// Forgets recorded requests.
    pub fn reset(&self) {
        self.inner.requests.lock().clear();
    }

    fn answer(&self, request: &Request) -> CannedResponse {
        let routes = self.inner.routes.lock();
        match routes.get(request.uri().path()) {
            Some(response) => response.clone(),
            None => self.inner.fallback.lock().clone(),
        }
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: Request) -> ResponseFuture<'_> {
        let canned = self.answer(&request);
        trace!(uri = %request.uri(), status = %canned.status(), "stub answering");
        self.inner.requests.lock().push(request);
        Box::pin(async move { Ok::<_, HalError>(canned.to_response()) })
    }
}
