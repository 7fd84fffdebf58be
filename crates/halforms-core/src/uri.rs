//! URI resolution.
//!
//! Every relative reference found in a document is resolved with
//! [`absolutize`], which follows standard reference resolution (RFC 3986
//! section 5, as implemented by the `url` crate).
//!
//! A base that is missing or not itself absolute is resolved against a
//! synthetic origin which is stripped again from the result, so resolution
//! always succeeds for well-formed references and yields a path-only value:
//!
//! ```
//! use halforms_core::uri::absolutize;
//!
//! assert_eq!(absolutize("test", Some("https://api.test/hello/")).unwrap(), "https://api.test/hello/test");
//! assert_eq!(absolutize("test", Some("https://api.test/hello")).unwrap(), "https://api.test/test");
//! assert_eq!(absolutize("test", Some("/hello/")).unwrap(), "/hello/test");
//! assert_eq!(absolutize("test/hello", None).unwrap(), "/test/hello");
//! ```

use crate::error::{HalError, HalResult};
use url::{Position, Url};

/// Host of the origin used when no absolute base is available.
const SYNTHETIC_HOST: &str = "halforms.invalid";

/// Absolute origin used when no absolute base is available.
const SYNTHETIC_ORIGIN: &str = "https://halforms.invalid/";

/// Resolves `target` against `base` and returns the normalized result.
///
/// - An absolute `target` is returned as is (after normalization).
/// - An absolute `base` resolves `target` with the standard rules: a trailing
///   slash on the base keeps its last segment as a directory.
/// - A relative or missing `base` produces a path-only result.
pub fn absolutize(target: &str, base: Option<&str>) -> HalResult<String> {
    let resolved = resolve(target, base)?;
    if is_synthetic(&resolved) {
        return Ok(resolved[Position::BeforePath..].to_string());
    }
    Ok(resolved.into())
}

/// Resolves `target` against `base` into a [`Url`].
///
/// Unlike [`absolutize`] the synthetic origin is kept, so the result is
/// always absolute; use [`is_synthetic`] to detect it.
pub fn resolve(target: &str, base: Option<&str>) -> HalResult<Url> {
    let base_url = match base {
        Some(base) if has_scheme(base) => parse(base)?,
        other => {
            let origin = parse(SYNTHETIC_ORIGIN)?;
            join(&origin, other.unwrap_or_default())?
        }
    };
    join(&base_url, target)
}

/// Returns true if `url` was produced from a relative base.
pub fn is_synthetic(url: &Url) -> bool {
    url.scheme() == "https" && url.host_str() == Some(SYNTHETIC_HOST) && url.port().is_none()
}

/// Returns true if `reference` starts with a URI scheme (`scheme ":"`).
pub fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        }
        _ => false,
    }
}

fn parse(reference: &str) -> HalResult<Url> {
    Url::parse(reference).map_err(|source| HalError::InvalidUrl {
        target: reference.to_string(),
        source,
    })
}

fn join(base: &Url, reference: &str) -> HalResult<Url> {
    base.join(reference).map_err(|source| HalError::InvalidUrl {
        target: reference.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_base_and_relative_target() {
        assert_eq!(
            absolutize("/test", Some("https://halforms.test/hello/")).unwrap(),
            "https://halforms.test/test"
        );
        assert_eq!(
            absolutize("test", Some("https://halforms.test/hello/")).unwrap(),
            "https://halforms.test/hello/test"
        );
        assert_eq!(
            absolutize("test", Some("https://halforms.test/hello")).unwrap(),
            "https://halforms.test/test"
        );
    }

    #[test]
    fn test_absolute_base_and_absolute_target() {
        assert_eq!(
            absolutize(
                "https://subdomain.halforms.test/test",
                Some("https://halforms.test/hello/")
            )
            .unwrap(),
            "https://subdomain.halforms.test/test"
        );
    }

    #[test]
    fn test_relative_base_and_relative_target() {
        assert_eq!(absolutize("/test", Some("/hello/")).unwrap(), "/test");
        assert_eq!(absolutize("/test", Some("/hello")).unwrap(), "/test");
        assert_eq!(absolutize("test", Some("/hello/")).unwrap(), "/hello/test");
        assert_eq!(absolutize("test", Some("/hello")).unwrap(), "/test");
    }

    #[test]
    fn test_missing_base() {
        assert_eq!(absolutize("/test", None).unwrap(), "/test");
        assert_eq!(absolutize("test", None).unwrap(), "/test");
        assert_eq!(absolutize("test/hello", None).unwrap(), "/test/hello");
        assert_eq!(absolutize("/test/hello", None).unwrap(), "/test/hello");
    }

    #[test]
    fn test_query_and_fragment_survive_without_base() {
        assert_eq!(
            absolutize("orders?page=2#top", Some("/api/")).unwrap(),
            "/api/orders?page=2#top"
        );
    }

    #[test]
    fn test_origin_only_base_is_normalized() {
        assert_eq!(
            absolutize("", Some("https://halforms.test")).unwrap(),
            "https://halforms.test/"
        );
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://halforms.test"));
        assert!(has_scheme("urn:isbn:0451450523"));
        assert!(has_scheme("coap+tcp://host"));
        assert!(!has_scheme("/relative:path"));
        assert!(!has_scheme("1http://nope"));
        assert!(!has_scheme("relative"));
    }

    #[test]
    fn test_unresolvable_reference() {
        let err = absolutize("http://[::1", None).unwrap_err();
        assert!(matches!(err, HalError::InvalidUrl { .. }));
    }
}
