//! Common types used throughout the filter chain.
//!
//! Requests and responses are plain `http` values with a fully buffered
//! body; neither the chain nor the client streams.

use bytes::Bytes;
use halforms_core::HalResult;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use std::future::Future;
use std::pin::Pin;

/// The HTTP request type flowing through the chain.
pub type Request = http::Request<Bytes>;

/// The HTTP response type flowing back through the chain.
pub type Response = http::Response<Bytes>;

/// A boxed future, as returned by filters and transports.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Future returned by a filter or a transport.
pub type ResponseFuture<'a> = BoxFuture<'a, HalResult<Response>>;

/// Copies a request so it can be sent more than once.
///
/// Method, URI, version, headers and body are copied; extensions are not.
pub fn clone_request(request: &Request) -> Request {
    let mut copy = Request::new(request.body().clone());
    *copy.method_mut() = request.method().clone();
    *copy.uri_mut() = request.uri().clone();
    *copy.version_mut() = request.version();
    *copy.headers_mut() = request.headers().clone();
    copy
}

/// Returns true if responses with `status` carry no document.
pub fn is_bodiless(status: StatusCode) -> bool {
    status.is_informational()
        || matches!(
            status,
            StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
        )
}

/// Extension trait for building responses, mostly from filters that
/// short-circuit the chain.
pub trait ResponseExt {
    /// Creates a response with no body.
    fn empty(status: StatusCode) -> Response;

    /// Creates a `text/plain` response.
    fn text(status: StatusCode, body: impl Into<String>) -> Response;

    /// Creates a JSON response with the given content type.
    fn json_as(status: StatusCode, content_type: &'static str, body: &serde_json::Value)
        -> Response;

    /// Creates a HAL-FORMS response.
    fn hal(status: StatusCode, body: &serde_json::Value) -> Response {
        Self::json_as(status, "application/prs.hal-forms+json", body)
    }
}

impl ResponseExt for Response {
    fn empty(status: StatusCode) -> Response {
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = status;
        response
    }

    fn text(status: StatusCode, body: impl Into<String>) -> Response {
        let mut response = Response::new(Bytes::from(body.into()));
        *response.status_mut() = status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }

    fn json_as(
        status: StatusCode,
        content_type: &'static str,
        body: &serde_json::Value,
    ) -> Response {
        let mut response = Response::new(Bytes::from(body.to_string()));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        response
    }
}
