//! Recording filters.

use crate::canned::CannedResponse;
use halforms_client::{clone_request, Filter, HalClient, HalError, Next, Request, ResponseFuture};
use parking_lot::Mutex;
use std::sync::Arc;

/// Terminal filter: records the request and answers with a canned response
/// without calling the rest of the chain.
///
/// Register it last to observe the request exactly as the transport would
/// receive it. Clones share the recorded requests, so keep one to inspect
/// after handing the other to a client.
///
/// # Example
///
/// ```
/// use halforms_test::{CannedResponse, RecordingFilter};
/// use serde_json::json;
///
/// let recorder = RecordingFilter::new(CannedResponse::ok(&json!({})));
/// let handle = recorder.clone();
/// // client.append_filter(recorder);
/// assert!(handle.requests().is_empty());
/// # drop(recorder);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingFilter {
    response: CannedResponse,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl RecordingFilter {
    /// Creates a filter answering with `response`.
    pub fn new(response: CannedResponse) -> Self {
        Self {
            response,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Copies of the recorded requests, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().iter().map(clone_request).collect()
    }

    /// Copy of the latest recorded request.
    pub fn last_request(&self) -> Option<Request> {
        self.requests.lock().last().map(clone_request)
    }

    /// Number of recorded requests.
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Default for RecordingFilter {
    fn default() -> Self {
        Self::new(CannedResponse::default())
    }
}

impl Filter for RecordingFilter {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn filter<'a>(
        &'a self,
        _client: &'a HalClient,
        request: Request,
        _next: Next<'a>,
    ) -> ResponseFuture<'a> {
        self.requests.lock().push(request);
        let response = self.response.to_response();
        Box::pin(async move { Ok::<_, HalError>(response) })
    }
}
