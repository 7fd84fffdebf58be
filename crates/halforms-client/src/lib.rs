//! # Halforms Client
//!
//! Client side of the Halforms toolkit: a filter chain in front of an HTTP
//! transport, a client facade that resolves targets against a base address,
//! and extension traits to follow links and invoke templates parsed by
//! `halforms-core`.
//!
//! ## Request flow
//!
//! ```text
//! HalClient::fetch ──► filter 1 ──► filter 2 ──► ... ──► Transport
//!                                                          │
//! HalResponse ◄─────── filter 1 ◄── filter 2 ◄── ... ◄─────┘
//!      │
//!      └── hal() ──► Resource (links remember the client)
//! ```
//!
//! ## Key Features
//!
//! - **Replayable chain**: a filter may call its continuation any number of
//!   times, or not at all
//! - **Ordered registration**: `prepend_filter` and `append_filter` decide
//!   where a filter runs
//! - **Relative targets**: every target is resolved against the base address
//! - **Content negotiation**: a weighted `accept` header is sent by default
//!
//! ## Example
//!
//! ```no_run
//! use halforms_client::{HalClient, LinkExt, UriVariables};
//!
//! # async fn run() -> halforms_core::HalResult<()> {
//! let client = HalClient::new("https://api.test/")?;
//! let orders = client.fetch_hal("orders").await?;
//! if let Some(find) = orders.link("ea:find")? {
//!     let order = find
//!         .follow(&UriVariables::new().with("id", 42), None)
//!         .await?
//!         .hal()?;
//!     println!("{:?}", order.content());
//! }
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/halforms-client/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod client;
pub mod config;
pub mod filter;
pub mod follow;
pub mod response;
pub mod transport;
pub mod types;

pub use chain::{BoxedFilter, FilterChain};
pub use client::{ClientBuilder, HalClient, RequestBuilder};
pub use config::{ClientConfig, ConfigLoader, HAL_FORMS_MEDIA_TYPE, HAL_MEDIA_TYPE};
pub use filter::{Filter, FnFilter, Next};
pub use follow::{InvokePayload, LinkExt, TemplateExt};
pub use response::HalResponse;
pub use transport::{ReqwestTransport, Transport};
pub use types::{clone_request, is_bodiless, BoxFuture, Request, Response, ResponseExt, ResponseFuture};

pub use halforms_core::{HalError, HalResult, UriVariables};
