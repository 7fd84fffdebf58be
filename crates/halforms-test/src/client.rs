//! Client wired to an in-memory transport.

use crate::canned::CannedResponse;
use crate::transport::StubTransport;
use halforms_client::HalClient;
use serde_json::Value;
use std::ops::Deref;

/// Base address used by [`TestHalClient`] unless one is given.
pub const TEST_BASE_HREF: &str = "https://hal.test/";

/// A [`HalClient`] over a [`StubTransport`].
///
/// Dereferences to the client, so every client method is available
/// directly; [`TestHalClient::transport`] exposes what was sent.
///
/// # Example
///
/// ```
/// use halforms_test::{documents, TestHalClient};
///
/// # tokio_test::block_on(async {
/// let client = TestHalClient::serving(&documents::orders());
/// let orders = client.fetch_hal("orders").await.unwrap();
/// assert_eq!(orders.self_href(), "https://hal.test/orders");
/// assert_eq!(client.transport().calls(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TestHalClient {
    client: HalClient,
    transport: StubTransport,
}

impl TestHalClient {
    /// Creates a client over `transport` with [`TEST_BASE_HREF`] as base.
    pub fn new(transport: StubTransport) -> Self {
        Self::with_base(TEST_BASE_HREF, transport)
    }

    /// Creates a client answering `document` to every request.
    pub fn serving(document: &Value) -> Self {
        Self::new(StubTransport::always(CannedResponse::ok(document)))
    }

    /// Creates a client over `transport` with the given base.
    ///
    /// # Panics
    ///
    /// Panics if `base_href` is empty.
    pub fn with_base(base_href: &str, transport: StubTransport) -> Self {
        let client = HalClient::builder()
            .base_href(base_href)
            .transport(transport.clone())
            .build()
            .unwrap_or_else(|e| panic!("invalid test client: {e}"));
        Self { client, transport }
    }

    /// The wrapped client.
    pub fn client(&self) -> &HalClient {
        &self.client
    }

    /// The transport requests end up in.
    pub fn transport(&self) -> &StubTransport {
        &self.transport
    }
}

impl Deref for TestHalClient {
    type Target = HalClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
