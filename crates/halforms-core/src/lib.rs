//! # Halforms Core
//!
//! HAL and HAL-FORMS document model for the Halforms client.
//!
//! This crate turns a JSON document into a navigable graph of resources,
//! links, embedded resources and templates. It has no knowledge of HTTP:
//! following links and invoking templates live in `halforms-client`.
//!
//! ## Modules
//!
//! - [`uri`]: reference resolution against absolute or relative bases
//! - [`model`]: [`Resource`], [`Link`], [`Template`], [`Property`]
//! - [`parser`]: [`DocumentParser`] and the [`parse`] shortcut
//!
//! ## Example
//!
//! ```
//! use halforms_core::{parse, HalError};
//! use serde_json::json;
//!
//! let orders = parse(
//!     "https://hal.test/orders",
//!     json!({
//!         "_links": {
//!             "self": { "href": "/orders" },
//!             "ea:admin": [
//!                 { "href": "/admins/2", "title": "Fred" },
//!                 { "href": "/admins/5", "title": "Kate" }
//!             ]
//!         },
//!         "currentlyProcessing": 14
//!     }),
//! );
//!
//! assert_eq!(orders.links("ea:admin").unwrap().unwrap().len(), 2);
//! assert!(matches!(orders.link("ea:admin"), Err(HalError::MultivaluedLink { .. })));
//! ```

#![doc(html_root_url = "https://docs.rs/halforms-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod model;
pub mod parser;
pub mod uri;

pub use error::{BoxError, ErrorKind, HalError, HalResult};
pub use model::{
    Link, OneOrMany, OriginRef, Property, PropertyType, Resource, ResourceParts, Template,
    UriVariables, VariableValue,
};
pub use parser::{parse, DocumentParser};
pub use uri::absolutize;
