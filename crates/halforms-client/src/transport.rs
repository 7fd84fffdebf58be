//! Transport boundary.
//!
//! The transport is the terminal stage of the chain: it sends the final
//! request and buffers the response. [`ReqwestTransport`] is the default;
//! tests substitute an in-memory one.

use crate::types::{Request, Response, ResponseFuture};
use halforms_core::{HalError, HalResult};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Sends requests and produces responses.
pub trait Transport: Send + Sync + 'static {
    /// Performs `request` and returns the buffered response.
    fn execute(&self, request: Request) -> ResponseFuture<'_>;
}

/// Transport over a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest defaults.
    pub fn new() -> HalResult<Self> {
        Self::with_options(None, None)
    }

    /// Creates a transport with an optional overall timeout and user agent.
    pub fn with_options(timeout: Option<Duration>, user_agent: Option<&str>) -> HalResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|e| HalError::transport_with_source("failed to create client", e))?;
        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: Request) -> HalResult<Response> {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string();

        let response = self
            .client
            .request(parts.method, &url)
            .headers(parts.headers)
            .body(body)
            .send()
            .await
            .map_err(|e| HalError::transport_with_source(format!("request to {url} failed"), e))?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HalError::transport_with_source("failed to read body", e))?;
        debug!(url = %url, status = %status, bytes = body.len(), "response received");

        let mut buffered = Response::new(body);
        *buffered.status_mut() = status;
        *buffered.version_mut() = version;
        *buffered.headers_mut() = headers;
        Ok(buffered)
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> ResponseFuture<'_> {
        Box::pin(self.send(request))
    }
}
