//! Following links and invoking templates.
//!
//! Links and templates parsed by a client remember it weakly. The
//! [`LinkExt`] and [`TemplateExt`] traits send them through an explicit
//! client when one is given, or through that originating client otherwise.

use crate::client::HalClient;
use crate::response::HalResponse;
use crate::types::BoxFuture;
use bytes::Bytes;
use halforms_core::{HalError, HalResult, Link, OriginRef, Template, UriVariables};
use http::header::CONTENT_TYPE;
use http::Method;
use serde_json::Value;
use tracing::{debug, warn};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Body sent when invoking a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InvokePayload {
    /// No body.
    #[default]
    None,
    /// Raw bytes, sent as is.
    Bytes(Bytes),
    /// A JSON value, serialized on send.
    Json(Value),
    /// Form fields, url-encoded on send.
    Form(Vec<(String, String)>),
}

impl InvokePayload {
    /// Creates a form payload from name/value pairs.
    pub fn form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn encode(self, content_type: &str) -> HalResult<Bytes> {
        Ok(match self {
            Self::None => Bytes::new(),
            Self::Bytes(bytes) => bytes,
            Self::Json(value) => match value {
                Value::String(text) if content_type != JSON_CONTENT_TYPE => Bytes::from(text),
                value => Bytes::from(serde_json::to_vec(&value)?),
            },
            Self::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields)
                    .finish();
                Bytes::from(encoded)
            }
        })
    }
}

impl From<Value> for InvokePayload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Bytes> for InvokePayload {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for InvokePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<String> for InvokePayload {
    fn from(text: String) -> Self {
        Self::Bytes(Bytes::from(text))
    }
}

impl From<&'static str> for InvokePayload {
    fn from(text: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

impl HalClient {
    /// Fetches the target of `link`, expanding it with `variables` if
    /// templated.
    pub async fn follow_link(
        &self,
        link: &Link,
        variables: &UriVariables,
    ) -> HalResult<HalResponse> {
        if let Some(deprecation) = link.deprecation() {
            warn!(rel = link.rel(), deprecation, "following deprecated link");
        }
        let target = link.expand(variables)?;
        debug!(rel = link.rel(), url = %target, "following link");
        self.fetch(&target).await
    }

    /// Sends `payload` to the target of `template` with its method.
    ///
    /// Unless the content type is `multipart/*`, a `content-type` header
    /// equal to the template's content type is set. A JSON payload is
    /// serialized as JSON, except for string values sent with a non-JSON
    /// content type, which are sent verbatim.
    pub async fn invoke_template(
        &self,
        template: &Template,
        payload: InvokePayload,
    ) -> HalResult<HalResponse> {
        let method = parse_method(template.method())?;
        let content_type = template.content_type();
        let multipart = content_type
            .get(..10)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/"));

        let mut request = self.request(method, template.resolved_url());
        if !multipart {
            request = request.header(CONTENT_TYPE, content_type);
        }
        debug!(key = template.key(), url = template.resolved_url(), "invoking template");
        request.body(payload.encode(content_type)?).send().await
    }
}

/// Following a [`Link`] through a client.
pub trait LinkExt {
    /// Fetches this link's target through `client`, or the client the link
    /// was parsed by when `client` is `None`.
    ///
    /// Fails with [`HalError::NoClient`] if neither is available.
    fn follow<'a>(
        &'a self,
        variables: &'a UriVariables,
        client: Option<&'a HalClient>,
    ) -> BoxFuture<'a, HalResult<HalResponse>>;
}

impl LinkExt for Link {
    fn follow<'a>(
        &'a self,
        variables: &'a UriVariables,
        client: Option<&'a HalClient>,
    ) -> BoxFuture<'a, HalResult<HalResponse>> {
        Box::pin(async move {
            let client = select_client(client, self.origin(), self.rel())?;
            client.follow_link(self, variables).await
        })
    }
}

/// Invoking a [`Template`] through a client.
pub trait TemplateExt {
    /// Sends `payload` to this template's target through `client`, or the
    /// client the template was parsed by when `client` is `None`.
    ///
    /// Fails with [`HalError::NoClient`] if neither is available.
    fn invoke<'a>(
        &'a self,
        payload: InvokePayload,
        client: Option<&'a HalClient>,
    ) -> BoxFuture<'a, HalResult<HalResponse>>;
}

impl TemplateExt for Template {
    fn invoke<'a>(
        &'a self,
        payload: InvokePayload,
        client: Option<&'a HalClient>,
    ) -> BoxFuture<'a, HalResult<HalResponse>> {
        Box::pin(async move {
            let client = select_client(client, self.origin(), self.key())?;
            client.invoke_template(self, payload).await
        })
    }
}

fn select_client(
    explicit: Option<&HalClient>,
    origin: Option<&OriginRef>,
    rel: &str,
) -> HalResult<HalClient> {
    if let Some(client) = explicit {
        return Ok(client.clone());
    }
    origin
        .and_then(HalClient::from_origin)
        .ok_or_else(|| HalError::NoClient {
            rel: rel.to_string(),
        })
}

fn parse_method(method: &str) -> HalResult<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| HalError::InvalidMethod(method.to_string()))
}
