//! Logging setup for applications built on Halforms.
//!
//! The Halforms crates report through `tracing`:
//!
//! - `halforms_core` warns about malformed links, embedded resources and
//!   templates it drops while parsing
//! - `halforms_client` opens a span per request and warns when a
//!   deprecated link is followed
//!
//! This crate turns those events into output.
//!
//! # Example
//!
//! ```rust,ignore
//! use halforms_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> halforms_telemetry::TelemetryResult<()> {
//!     init_logging(&LogConfig::production().with_level("halforms_client=debug,info"))?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/halforms-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
