//! Buffered responses with parse-on-demand.

use crate::client::HalClient;
use crate::types::{is_bodiless, Response};
use bytes::Bytes;
use halforms_core::{HalResult, Resource};
use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

/// Response to a request sent by a [`HalClient`].
///
/// The body is fully buffered, so every accessor can be called any number
/// of times. [`HalResponse::hal`] parses the body as a HAL document whose
/// base is the URL the request was sent to.
#[derive(Clone)]
pub struct HalResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    url: String,
    client: HalClient,
}

impl HalResponse {
    pub(crate) fn new(response: Response, url: String, client: HalClient) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
            url,
            client,
        }
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// URL the request was sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Client that sent the request.
    pub fn client(&self) -> &HalClient {
        &self.client
    }

    /// Raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8.
    pub fn text(&self) -> HalResult<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> HalResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body parsed as a HAL document.
    ///
    /// Statuses that carry no document (1xx, 204, 205, 304) yield an empty
    /// root resource whose self href is the request URL.
    pub fn hal(&self) -> HalResult<Resource> {
        if is_bodiless(self.status) {
            debug!(url = %self.url, status = %self.status, "no document to parse");
            return Ok(Resource::no_content(self.url.clone()));
        }
        self.client.parser().parse_slice(&self.url, &self.body)
    }

    /// Converts back into an `http` response.
    pub fn into_inner(self) -> Response {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers;
        response
    }
}

impl fmt::Debug for HalResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HalResponse")
            .field("status", &self.status)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}
