//! Ordered, replayable filter chain.
//!
//! The chain keeps its filters in a copy-on-write list. Every call to
//! [`FilterChain::process`] captures the list as it is when traversal starts
//! and walks that snapshot, so registering a filter never affects a request
//! already in flight and concurrent or replayed traversals never share a
//! cursor.

use crate::client::HalClient;
use crate::filter::{Filter, Next};
use crate::transport::Transport;
use crate::types::{Request, Response};
use halforms_core::HalResult;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A type-erased filter that can be stored in the chain.
pub type BoxedFilter = Arc<dyn Filter>;

/// Ordered list of filters run in front of the transport.
///
/// ```text
///   prepend(p2) ─┐
///   prepend(p1) ─┼─►  [p2, p1, a1, a2]  ──► transport
///   append(a1)  ─┤
///   append(a2)  ─┘
/// ```
pub struct FilterChain {
    filters: RwLock<Arc<[BoxedFilter]>>,
}

impl FilterChain {
    /// Creates an empty chain; requests go straight to the transport.
    pub fn new() -> Self {
        Self {
            filters: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Adds `filter` as the last stage, after every filter registered so far.
    pub fn append_filter(&self, filter: impl Filter) {
        self.append_boxed(Arc::new(filter));
    }

    /// Adds `filter` as the first stage, before every filter registered so far.
    pub fn prepend_filter(&self, filter: impl Filter) {
        self.prepend_boxed(Arc::new(filter));
    }

    /// Adds an already shared filter as the last stage.
    pub fn append_boxed(&self, filter: BoxedFilter) {
        debug!(filter = filter.name(), "appending filter");
        let mut filters = self.filters.write();
        let mut next = filters.to_vec();
        next.push(filter);
        *filters = Arc::from(next);
    }

    /// Adds an already shared filter as the first stage.
    pub fn prepend_boxed(&self, filter: BoxedFilter) {
        debug!(filter = filter.name(), "prepending filter");
        let mut filters = self.filters.write();
        let mut next = Vec::with_capacity(filters.len() + 1);
        next.push(filter);
        next.extend(filters.iter().cloned());
        *filters = Arc::from(next);
    }

    /// Runs `request` through every filter, then `transport`.
    ///
    /// Errors from filters or the transport are returned as is.
    pub async fn process(
        &self,
        client: &HalClient,
        transport: &dyn Transport,
        request: Request,
    ) -> HalResult<Response> {
        let snapshot = self.snapshot();
        Next::new(&snapshot, client, transport).run(request).await
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.read().len()
    }

    /// Returns true if no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.filters.read().is_empty()
    }

    /// Names of the registered filters, in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.read().iter().map(|f| f.name()).collect()
    }

    fn snapshot(&self) -> Arc<[BoxedFilter]> {
        Arc::clone(&self.filters.read())
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.names())
            .finish()
    }
}
