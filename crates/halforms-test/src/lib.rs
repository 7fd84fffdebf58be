//! # Halforms Test
//!
//! Test utilities for code built on the Halforms client. Requests are
//! answered in memory; nothing touches the network.
//!
//! ## Key Features
//!
//! - **Stub transport**: canned responses by path, every request recorded
//! - **Recording filter**: captures the request at any point of the chain
//!   and short-circuits it
//! - **Test client**: a [`HalClient`](halforms_client::HalClient) already
//!   wired to a stub
//! - **Documents**: canned HAL and HAL-FORMS documents
//!
//! ## Example
//!
//! ```
//! use halforms_test::{documents, CannedResponse, StubTransport, TestHalClient};
//! use halforms_client::{LinkExt, UriVariables};
//!
//! # tokio_test::block_on(async {
//! let transport = StubTransport::new()
//!     .with_route("/orders", CannedResponse::ok(&documents::orders()))
//!     .with_route("/orders/123", CannedResponse::ok(&documents::order()));
//! let client = TestHalClient::new(transport);
//!
//! let orders = client.fetch_hal("orders").await.unwrap();
//! let first = &orders.embeddeds("ea:order").unwrap().unwrap()[0];
//! let order = first
//!     .link("self")
//!     .unwrap()
//!     .unwrap()
//!     .follow(&UriVariables::new(), None)
//!     .await
//!     .unwrap()
//!     .hal()
//!     .unwrap();
//!
//! assert_eq!(order.template("default").unwrap().method(), "put");
//! assert_eq!(client.transport().calls(), 2);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/halforms-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod canned;
mod client;
pub mod documents;
mod filter;
mod transport;

pub use canned::CannedResponse;
pub use client::{TestHalClient, TEST_BASE_HREF};
pub use filter::RecordingFilter;
pub use transport::StubTransport;
