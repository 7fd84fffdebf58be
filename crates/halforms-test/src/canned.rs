//! Canned responses.

use bytes::Bytes;
use halforms_client::{Response, HAL_FORMS_MEDIA_TYPE};
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use serde_json::Value;

/// A response that can be produced any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct CannedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl CannedResponse {
    /// A response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// A HAL-FORMS document.
    pub fn hal(status: StatusCode, document: &Value) -> Self {
        Self::empty(status)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(HAL_FORMS_MEDIA_TYPE))
            .with_body(document.to_string())
    }

    /// A `200` HAL-FORMS document.
    pub fn ok(document: &Value) -> Self {
        Self::hal(StatusCode::OK, document)
    }

    /// A `text/plain` body.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::empty(status)
            .with_header(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )
            .with_body(body.into())
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds a fresh `http` response.
    pub fn to_response(&self) -> Response {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

impl Default for CannedResponse {
    fn default() -> Self {
        Self::ok(&Value::Object(serde_json::Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hal_response() {
        let canned = CannedResponse::ok(&json!({ "total": 1 }));
        let response = canned.to_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], HAL_FORMS_MEDIA_TYPE);
        assert_eq!(response.body(), &Bytes::from_static(br#"{"total":1}"#));
    }

    #[test]
    fn test_responses_are_independent() {
        let canned = CannedResponse::empty(StatusCode::NO_CONTENT);
        let mut first = canned.to_response();
        first
            .headers_mut()
            .insert("x-mutated", HeaderValue::from_static("1"));
        assert!(!canned.to_response().headers().contains_key("x-mutated"));
        assert!(canned.to_response().body().is_empty());
    }
}
