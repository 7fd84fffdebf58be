//! Client facade.
//!
//! [`HalClient`] builds requests, runs them through its [`FilterChain`] and
//! wraps the result in a [`HalResponse`] that parses itself on demand.

use crate::chain::{BoxedFilter, FilterChain};
use crate::config::ClientConfig;
use crate::filter::Filter;
use crate::response::HalResponse;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::Request;
use bytes::Bytes;
use halforms_core::uri::absolutize;
use halforms_core::{DocumentParser, HalError, HalResult, OriginRef, Resource};
use http::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, Method, Uri};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, Instrument};

/// Client for HAL-FORMS backends.
///
/// Cloning a client is cheap; clones share filters and transport.
/// Resources parsed from a client's responses keep a weak handle to it, so
/// their links can be followed without naming the client again.
///
/// # Example
///
/// ```no_run
/// use halforms_client::HalClient;
///
/// # async fn run() -> halforms_core::HalResult<()> {
/// let client = HalClient::new("https://api.test/")?;
/// let orders = client.fetch_hal("orders").await?;
/// if let Some(next) = orders.link("next")? {
///     println!("next page at {}", next.resolved_href()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HalClient {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    base_href: String,
    accept: HeaderValue,
    chain: FilterChain,
    transport: Arc<dyn Transport>,
}

impl HalClient {
    /// Creates a client over the default transport.
    pub fn new(base_href: impl Into<String>) -> HalResult<Self> {
        Self::builder().base_href(base_href).build()
    }

    /// Creates a client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from a validated configuration.
    pub fn from_config(config: &ClientConfig) -> HalResult<Self> {
        config.validate()?;
        let transport =
            ReqwestTransport::with_options(config.timeout(), config.user_agent.as_deref())?;
        Self::builder()
            .base_href(config.base_href.clone())
            .accepted_media_types(config.accepted_media_types.clone())
            .transport(transport)
            .build()
    }

    /// Base address relative targets are resolved against.
    pub fn base_href(&self) -> &str {
        &self.inner.base_href
    }

    /// Value of the `accept` header sent when the caller sets none.
    pub fn accept_header(&self) -> &HeaderValue {
        &self.inner.accept
    }

    /// The filter chain requests go through.
    pub fn filters(&self) -> &FilterChain {
        &self.inner.chain
    }

    /// Adds `filter` after every filter registered so far.
    pub fn append_filter(&self, filter: impl Filter) {
        self.inner.chain.append_filter(filter);
    }

    /// Adds `filter` before every filter registered so far.
    pub fn prepend_filter(&self, filter: impl Filter) {
        self.inner.chain.prepend_filter(filter);
    }

    /// Resolves `target` against the base address.
    pub fn resolve(&self, target: &str) -> HalResult<String> {
        absolutize(target, Some(&self.inner.base_href))
    }

    /// Sends a `GET` to `target`, resolved against the base address.
    pub async fn fetch(&self, target: &str) -> HalResult<HalResponse> {
        self.request(Method::GET, target).send().await
    }

    /// Sends a `GET` to the base address.
    pub async fn fetch_root(&self) -> HalResult<HalResponse> {
        self.request(Method::GET, "").send().await
    }

    /// Sends a `GET` to `target` and parses the response.
    pub async fn fetch_hal(&self, target: &str) -> HalResult<Resource> {
        self.fetch(target).await?.hal()
    }

    /// Starts building a request to `target`.
    pub fn request(&self, method: Method, target: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, target.into())
    }

    /// Sends a prebuilt request through the filter chain.
    ///
    /// A URI without scheme is resolved against the base address, and the
    /// default `accept` header is added if the request has none.
    pub async fn execute(&self, mut request: Request) -> HalResult<HalResponse> {
        if request.uri().scheme().is_none() {
            let resolved = self.resolve(&request.uri().to_string())?;
            *request.uri_mut() = parse_uri(&resolved)?;
        }
        if !request.headers().contains_key(ACCEPT) {
            request
                .headers_mut()
                .insert(ACCEPT, self.inner.accept.clone());
        }

        let url = request.uri().to_string();
        let span = tracing::debug_span!("hal_request", method = %request.method(), url = %url);
        let response = async {
            debug!("sending request");
            let response = self
                .inner
                .chain
                .process(self, self.inner.transport.as_ref(), request)
                .await?;
            debug!(status = %response.status(), "request completed");
            Ok::<_, HalError>(response)
        }
        .instrument(span)
        .await?;

        Ok(HalResponse::new(response, url, self.clone()))
    }

    /// Parser attaching this client as origin of parsed links and templates.
    pub fn parser(&self) -> DocumentParser {
        DocumentParser::with_origin(OriginRef::new(&self.inner))
    }

    /// Client a parsed value was fetched with, if it is still alive.
    pub fn from_origin(origin: &OriginRef) -> Option<Self> {
        origin.upgrade::<ClientInner>().map(|inner| Self { inner })
    }

    /// Returns true if both handles share the same client.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HalClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HalClient")
            .field("base_href", &self.inner.base_href)
            .field("accept", &self.inner.accept)
            .field("filters", &self.inner.chain)
            .finish_non_exhaustive()
    }
}

/// Builder for [`HalClient`].
pub struct ClientBuilder {
    base_href: Option<String>,
    accepted_media_types: Vec<String>,
    transport: Option<Arc<dyn Transport>>,
    filters: Vec<BoxedFilter>,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            base_href: None,
            accepted_media_types: ClientConfig::default().accepted_media_types,
            transport: None,
            filters: Vec::new(),
        }
    }

    /// Sets the base address (required).
    #[must_use]
    pub fn base_href(mut self, base_href: impl Into<String>) -> Self {
        self.base_href = Some(base_href.into());
        self
    }

    /// Sets the media types advertised in the default `accept` header.
    #[must_use]
    pub fn accepted_media_types<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_media_types = media_types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the transport; defaults to [`ReqwestTransport`].
    #[must_use]
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets a shared transport.
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Appends a filter to the initial chain.
    #[must_use]
    pub fn filter(mut self, filter: impl Filter) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Builds the client.
    pub fn build(self) -> HalResult<HalClient> {
        let base_href = self
            .base_href
            .filter(|base| !base.trim().is_empty())
            .ok_or_else(|| HalError::config("base_href is required"))?;
        if self.accepted_media_types.is_empty() {
            return Err(HalError::config("at least one accepted media type is required"));
        }
        let accept = accept_header(&self.accepted_media_types)?;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let chain = FilterChain::new();
        for filter in self.filters {
            chain.append_boxed(filter);
        }
        Ok(HalClient {
            inner: Arc::new(ClientInner {
                base_href,
                accept,
                chain,
                transport,
            }),
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_href", &self.base_href)
            .field("accepted_media_types", &self.accepted_media_types)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

/// Builder for a single request, created by [`HalClient::request`].
#[must_use = "a request does nothing until sent"]
pub struct RequestBuilder<'c> {
    client: &'c HalClient,
    method: Method,
    target: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<HalError>,
}

impl<'c> RequestBuilder<'c> {
    fn new(client: &'c HalClient, method: Method, target: String) -> Self {
        Self {
            client,
            method,
            target,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Adds a header. Invalid names or values fail on send.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        if self.error.is_some() {
            return self;
        }
        let name = HeaderName::try_from(name).map_err(Into::into);
        let value = HeaderValue::try_from(value).map_err(Into::into);
        match name.and_then(|name| value.map(|value| (name, value))) {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(e) => self.error = Some(HalError::Http(e)),
        }
        self
    }

    /// Adds every header of `headers`.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as the JSON body, setting `content-type` if unset.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.body = Bytes::from(body);
                if !self.headers.contains_key(CONTENT_TYPE) {
                    self.headers
                        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
            }
            Err(e) => {
                self.error.get_or_insert(HalError::Decode(e));
            }
        }
        self
    }

    /// Builds the request without sending it.
    pub fn build(self) -> HalResult<Request> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let uri = parse_uri(&self.client.resolve(&self.target)?)?;
        let mut request = Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = uri;
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    /// Sends the request through the client's filter chain.
    pub async fn send(self) -> HalResult<HalResponse> {
        let client = self.client;
        let request = self.build()?;
        client.execute(request).await
    }

    /// Sends the request and parses the response.
    pub async fn send_hal(self) -> HalResult<Resource> {
        self.send().await?.hal()
    }
}

impl fmt::Debug for RequestBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("target", &self.target)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn parse_uri(url: &str) -> HalResult<Uri> {
    url.parse::<Uri>()
        .map_err(|e| HalError::Http(http::Error::from(e)))
}

/// Builds `"a;q=1, b;q=0.9, ..."`, weights decreasing by a tenth.
fn accept_header(media_types: &[String]) -> HalResult<HeaderValue> {
    let value = media_types
        .iter()
        .enumerate()
        .map(|(index, media_type)| format!("{media_type};q={}", quality(index)))
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&value).map_err(|e| HalError::invalid_header(ACCEPT.as_str(), e.to_string()))
}

fn quality(index: usize) -> String {
    match 10usize.saturating_sub(index) {
        10 => "1".to_string(),
        0 => "0".to_string(),
        tenths => format!("0.{tenths}"),
    }
}
