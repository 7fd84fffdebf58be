//! Error types for Halforms.
//!
//! This module provides the [`HalError`] type, which is the standard error
//! type used throughout the Halforms crates.
//!
//! # Error kinds
//!
//! Errors are classified by [`ErrorKind`] so callers can react to a whole
//! family of failures without matching every variant:
//!
//! | `ErrorKind` | Raised by | Recovered internally |
//! |---|---|---|
//! | `ShapeMismatch` | graph accessors (`link`, `links`, `embedded`, ...) | never |
//! | `Resolution` | URI resolution, URI template expansion | never |
//! | `Decode` | parse-on-demand of a response body | never |
//! | `Transport` | the transport or a filter | never |
//! | `Request` | building an outbound request | never |
//! | `Config` | client configuration loading | never |
//!
//! Malformed fragments inside a document (a link without `href`, a property
//! without `name`, an invalid `regex`) are not errors: the parser logs them
//! and drops the offending entry.

use thiserror::Error;

/// Result type alias using [`HalError`].
pub type HalResult<T> = Result<T, HalError>;

/// Boxed error used as the source of transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Families of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller assumed a cardinality or name uniqueness the document does not have.
    ShapeMismatch,
    /// A URI could not be resolved or a URI template could not be expanded.
    Resolution,
    /// A response body could not be decoded.
    Decode,
    /// The transport (or a filter) failed to produce a response.
    Transport,
    /// An outbound request could not be built.
    Request,
    /// Client configuration is invalid.
    Config,
}

/// Standard error type for Halforms.
///
/// # Example
///
/// ```
/// use halforms_core::{HalError, ErrorKind};
///
/// let err = HalError::multivalued_link("ea:admin");
/// assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
/// assert_eq!(err.to_string(), "link ea:admin is multivalued");
/// ```
#[derive(Error, Debug)]
pub enum HalError {
    /// A single link was requested but the relation is declared as an array.
    #[error("link {rel} is multivalued")]
    MultivaluedLink {
        /// Relation that was requested.
        rel: String,
    },

    /// An array of links was requested but the relation is declared as a single object.
    #[error("link {rel} is monovalued")]
    MonovaluedLink {
        /// Relation that was requested.
        rel: String,
    },

    /// A single embedded resource was requested but the relation is declared as an array.
    #[error("embedded {rel} is multivalued")]
    MultivaluedEmbedded {
        /// Relation that was requested.
        rel: String,
    },

    /// An array of embedded resources was requested but the relation is declared as a single object.
    #[error("embedded {rel} is monovalued")]
    MonovaluedEmbedded {
        /// Relation that was requested.
        rel: String,
    },

    /// A `(rel, name)` lookup expected one match and found several.
    #[error("{count} entries of {rel} are named {name}")]
    AmbiguousName {
        /// Relation that was requested.
        rel: String,
        /// Name used as secondary key.
        name: String,
        /// Number of matching entries.
        count: usize,
    },

    /// A URI could not be parsed or resolved.
    #[error("cannot resolve {target}: {source}")]
    InvalidUrl {
        /// The reference being resolved.
        target: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// A URI template could not be parsed or expanded.
    #[error("cannot expand URI template {template}: {message}")]
    UriTemplate {
        /// The raw template.
        template: String,
        /// Description of the failure.
        message: String,
    },

    /// A response body is not valid JSON (or not the expected shape).
    #[error("cannot decode body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A response body is not valid UTF-8 text.
    #[error("body is not valid UTF-8: {0}")]
    InvalidBody(#[from] std::string::FromUtf8Error),

    /// The transport failed to produce a response.
    #[error("transport error: {message}")]
    Transport {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// An outbound request could not be assembled.
    #[error("cannot build request: {0}")]
    Http(#[from] http::Error),

    /// A header name or value is invalid.
    #[error("invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name as supplied.
        name: String,
        /// Description of the failure.
        message: String,
    },

    /// An HTTP method is invalid.
    #[error("invalid method {0}")]
    InvalidMethod(String),

    /// A link or template was followed without a client and its originating client is gone.
    #[error("no client available to follow {rel}")]
    NoClient {
        /// Relation (or template key) being followed.
        rel: String,
    },

    /// Client configuration is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

impl HalError {
    /// Creates a [`HalError::MultivaluedLink`].
    #[must_use]
    pub fn multivalued_link(rel: impl Into<String>) -> Self {
        Self::MultivaluedLink { rel: rel.into() }
    }

    /// Creates a [`HalError::MonovaluedLink`].
    #[must_use]
    pub fn monovalued_link(rel: impl Into<String>) -> Self {
        Self::MonovaluedLink { rel: rel.into() }
    }

    /// Creates a [`HalError::MultivaluedEmbedded`].
    #[must_use]
    pub fn multivalued_embedded(rel: impl Into<String>) -> Self {
        Self::MultivaluedEmbedded { rel: rel.into() }
    }

    /// Creates a [`HalError::MonovaluedEmbedded`].
    #[must_use]
    pub fn monovalued_embedded(rel: impl Into<String>) -> Self {
        Self::MonovaluedEmbedded { rel: rel.into() }
    }

    /// Creates a [`HalError::AmbiguousName`].
    #[must_use]
    pub fn ambiguous_name(rel: impl Into<String>, name: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousName {
            rel: rel.into(),
            name: name.into(),
            count,
        }
    }

    /// Creates a transport error with a message.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error wrapping an underlying error.
    #[must_use]
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a URI template error.
    #[must_use]
    pub fn uri_template(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UriTemplate {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the family this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MultivaluedLink { .. }
            | Self::MonovaluedLink { .. }
            | Self::MultivaluedEmbedded { .. }
            | Self::MonovaluedEmbedded { .. }
            | Self::AmbiguousName { .. } => ErrorKind::ShapeMismatch,
            Self::InvalidUrl { .. } | Self::UriTemplate { .. } => ErrorKind::Resolution,
            Self::Decode(_) | Self::InvalidBody(_) => ErrorKind::Decode,
            Self::Transport { .. } | Self::NoClient { .. } => ErrorKind::Transport,
            Self::Http(_) | Self::InvalidHeader { .. } | Self::InvalidMethod(_) => {
                ErrorKind::Request
            }
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Returns true if the caller's assumed document shape was wrong.
    #[must_use]
    pub const fn is_shape_mismatch(&self) -> bool {
        matches!(self.kind(), ErrorKind::ShapeMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_messages() {
        assert_eq!(
            HalError::multivalued_link("songs").to_string(),
            "link songs is multivalued"
        );
        assert_eq!(
            HalError::monovalued_link("next").to_string(),
            "link next is monovalued"
        );
        assert_eq!(
            HalError::multivalued_embedded("waldo").to_string(),
            "embedded waldo is multivalued"
        );
        assert_eq!(
            HalError::monovalued_embedded("baz").to_string(),
            "embedded baz is monovalued"
        );
        assert_eq!(
            HalError::ambiguous_name("family:members", "daughter", 2).to_string(),
            "2 entries of family:members are named daughter"
        );
    }

    #[test]
    fn test_all_shape_errors_are_classified() {
        let errors = [
            HalError::multivalued_link("a"),
            HalError::monovalued_link("a"),
            HalError::multivalued_embedded("a"),
            HalError::monovalued_embedded("a"),
            HalError::ambiguous_name("a", "b", 2),
        ];
        for err in &errors {
            assert!(err.is_shape_mismatch(), "{err} should be a shape mismatch");
        }
    }

    #[test]
    fn test_other_kinds() {
        assert_eq!(HalError::transport("boom").kind(), ErrorKind::Transport);
        assert_eq!(
            HalError::uri_template("{", "unclosed").kind(),
            ErrorKind::Resolution
        );
        assert_eq!(HalError::config("missing").kind(), ErrorKind::Config);
        assert_eq!(
            HalError::InvalidMethod("BAD METHOD".into()).kind(),
            ErrorKind::Request
        );

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HalError = decode.into();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(!err.is_shape_mismatch());
    }

    #[test]
    fn test_transport_source_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = HalError::transport_with_source("connect failed", io);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "transport error: connect failed");
    }
}
