//! # Halforms
//!
//! **Client for HAL and HAL-FORMS hypermedia APIs**
//!
//! Halforms fetches JSON documents, turns them into a graph of resources,
//! links, embedded resources and forms, and lets the caller navigate that
//! graph by relation instead of by URL:
//!
//! - **Cardinality aware**: a relation is either single or multivalued, and
//!   asking for the wrong shape is an error rather than a silent guess
//! - **Relative links**: every href resolves against the nearest self link
//! - **Forms**: HAL-FORMS templates are invoked with their method, target
//!   and content type
//! - **Filters**: requests pass through an ordered, replayable filter chain
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use halforms::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> HalResult<()> {
//!     let client = HalClient::new("https://api.example.com/")?;
//!     let orders = client.fetch_hal("orders").await?;
//!
//!     for order in orders.embeddeds("ea:order")?.unwrap_or_default() {
//!         println!("{} {:?}", order.self_href(), order.content());
//!     }
//!
//!     if let Some(next) = orders.link("next")? {
//!         let page = next.follow(&UriVariables::new(), None).await?.hal()?;
//!         println!("next page at {}", page.self_href());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! HalClient ──► FilterChain ──► Transport (reqwest)
//!     ▲                              │
//!     │                              ▼
//! Link::follow ◄── Resource ◄── DocumentParser
//! Template::invoke
//! ```

#![doc(html_root_url = "https://docs.rs/halforms/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Document model and parser
pub use halforms_core as core;

// Client, filters and transport
pub use halforms_client as client;

// Logging setup
pub use halforms_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use halforms::prelude::*;
/// ```
pub mod prelude {
    pub use halforms_core::{
        parse, DocumentParser, HalError, HalResult, Link, OneOrMany, Property, PropertyType,
        Resource, Template, UriVariables, VariableValue,
    };

    pub use halforms_client::{
        clone_request, ClientConfig, ConfigLoader, Filter, FnFilter, HalClient, HalResponse,
        InvokePayload, LinkExt, Next, Request, Response, ResponseExt, ResponseFuture,
        TemplateExt, Transport,
    };

    pub use halforms_telemetry::{init_logging, LogConfig};
}
