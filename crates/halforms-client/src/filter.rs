//! Filter trait and continuation.
//!
//! A [`Filter`] sits between the client and the transport. It receives the
//! outbound request, the client running the chain and a [`Next`]
//! continuation standing for the rest of the chain. A filter may:
//!
//! - forward the request unchanged (`next.run(request)`),
//! - alter the request before forwarding it,
//! - inspect or replace the response after awaiting `next`,
//! - call `next` several times, replaying the rest of the chain,
//! - never call `next`, answering with a response of its own.
//!
//! # Example
//!
//! ```
//! use halforms_client::{Filter, FnFilter, Next, Request, ResponseFuture, HalClient};
//! use http::HeaderValue;
//!
//! struct Bearer(&'static str);
//!
//! impl Filter for Bearer {
//!     fn name(&self) -> &'static str {
//!         "bearer"
//!     }
//!
//!     fn filter<'a>(
//!         &'a self,
//!         _client: &'a HalClient,
//!         mut request: Request,
//!         next: Next<'a>,
//!     ) -> ResponseFuture<'a> {
//!         request
//!             .headers_mut()
//!             .insert("authorization", HeaderValue::from_static(self.0));
//!         next.run(request)
//!     }
//! }
//!
//! let timing = FnFilter::new("timing", |_client, request, next| {
//!     Box::pin(async move {
//!         let response = next.run(request).await;
//!         if let Ok(response) = &response {
//!             tracing::debug!(status = %response.status(), "response received");
//!         }
//!         response
//!     })
//! });
//! # let _ = (Bearer("Bearer token"), timing);
//! ```

use crate::client::HalClient;
use crate::transport::Transport;
use crate::types::{Request, ResponseFuture};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A stage of the filter chain.
///
/// Filters are shared between every request sent by a client, possibly
/// concurrently, and must not keep per-request state in `self`.
pub trait Filter: Send + Sync + 'static {
    /// Name of this filter, used in diagnostics.
    fn name(&self) -> &'static str {
        "anonymous"
    }

    /// Processes `request`, usually by calling `next.run`.
    fn filter<'a>(
        &'a self,
        client: &'a HalClient,
        request: Request,
        next: Next<'a>,
    ) -> ResponseFuture<'a>;
}

/// Continuation invoking the rest of the chain, then the transport.
///
/// `Next` is `Copy`: [`Next::run`] may be called zero, one or many times.
/// Each call replays the remaining filters from the same position.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    filters: &'a [Arc<dyn Filter>],
    client: &'a HalClient,
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        filters: &'a [Arc<dyn Filter>],
        client: &'a HalClient,
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            filters,
            client,
            transport,
        }
    }

    /// Runs the remaining filters, and the transport once they all forwarded.
    pub fn run(self, request: Request) -> ResponseFuture<'a> {
        match self.filters.split_first() {
            Some((filter, rest)) => {
                trace!(filter = filter.name(), uri = %request.uri(), "entering filter");
                let next = Self {
                    filters: rest,
                    ..self
                };
                filter.filter(self.client, request, next)
            }
            None => {
                trace!(method = %request.method(), uri = %request.uri(), "sending request");
                self.transport.execute(request)
            }
        }
    }

    /// Number of filters left before the transport.
    pub fn remaining(&self) -> usize {
        self.filters.len()
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// A filter built from a closure.
///
/// The closure returns a boxed future, typically `Box::pin(async move { .. })`.
pub struct FnFilter<F> {
    name: &'static str,
    func: F,
}

impl<F> FnFilter<F>
where
    F: for<'a> Fn(&'a HalClient, Request, Next<'a>) -> ResponseFuture<'a> + Send + Sync + 'static,
{
    /// Creates a new closure-based filter.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Filter for FnFilter<F>
where
    F: for<'a> Fn(&'a HalClient, Request, Next<'a>) -> ResponseFuture<'a> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn filter<'a>(
        &'a self,
        client: &'a HalClient,
        request: Request,
        next: Next<'a>,
    ) -> ResponseFuture<'a> {
        (self.func)(client, request, next)
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}
