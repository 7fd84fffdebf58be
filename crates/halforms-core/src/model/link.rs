//! HAL links.

use crate::error::{HalError, HalResult};
use crate::model::origin::OriginRef;
use crate::uri::absolutize;
use indexmap::IndexMap;
use iri_string::spec::UriSpec;
use iri_string::template::simple_context::{SimpleContext, Value};
use iri_string::template::{UriTemplateStr, UriTemplateString};

/// A link as described by the HAL specification.
///
/// `href` is kept exactly as found in the document; it may be absolute,
/// rooted, relative or templated. `base` is the resolution context captured
/// when the owning resource was parsed: the incoming base for `self`, the
/// resource's self href for every other relation.
///
/// # Example
///
/// ```
/// use halforms_core::{Link, UriVariables};
///
/// let link = Link::new("ea:find", "/orders{?id}", "http://hal.test/orders").with_templated(true);
/// let vars = UriVariables::new().with("id", "1234");
/// assert_eq!(link.expand(&vars).unwrap(), "http://hal.test/orders?id=1234");
/// ```
#[derive(Debug, Clone)]
pub struct Link {
    href: String,
    rel: String,
    base: String,
    templated: bool,
    media_type: Option<String>,
    deprecation: Option<String>,
    name: Option<String>,
    profile: Option<String>,
    title: Option<String>,
    hreflang: Option<String>,
    /// `href` compiled as a URI template, absent if it is not a valid one.
    template: Option<UriTemplateString>,
    origin: Option<OriginRef>,
}

impl Link {
    /// Creates a non-templated link with no optional attributes.
    pub fn new(rel: impl Into<String>, href: impl Into<String>, base: impl Into<String>) -> Self {
        let href = href.into();
        let template = UriTemplateStr::new(&href).ok().map(ToOwned::to_owned);
        Self {
            href,
            rel: rel.into(),
            base: base.into(),
            templated: false,
            media_type: None,
            deprecation: None,
            name: None,
            profile: None,
            title: None,
            hreflang: None,
            template,
            origin: None,
        }
    }

    /// Marks the href as a URI template.
    #[must_use]
    pub fn with_templated(mut self, templated: bool) -> Self {
        self.templated = templated;
        self
    }

    /// Sets the media type hint (`type`).
    #[must_use]
    pub fn with_media_type(mut self, media_type: Option<String>) -> Self {
        self.media_type = media_type;
        self
    }

    /// Sets the deprecation notice URL.
    #[must_use]
    pub fn with_deprecation(mut self, deprecation: Option<String>) -> Self {
        self.deprecation = deprecation;
        self
    }

    /// Sets the name used as a secondary key within a relation.
    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Sets the profile of the target resource.
    #[must_use]
    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the human readable title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Sets the language of the target resource.
    #[must_use]
    pub fn with_hreflang(mut self, hreflang: Option<String>) -> Self {
        self.hreflang = hreflang;
        self
    }

    /// Attaches the client this link was fetched with.
    #[must_use]
    pub fn with_origin(mut self, origin: Option<OriginRef>) -> Self {
        self.origin = origin;
        self
    }

    /// Raw href as found in the document.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Relation between this link and its resource.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Base the href is resolved against.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether the href is a URI template.
    pub fn templated(&self) -> bool {
        self.templated
    }

    /// Media type of the target (the `type` attribute).
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// URL describing why this link is deprecated, if it is.
    pub fn deprecation(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }

    /// Secondary key among links sharing a relation.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Profile of the target resource (RFC 6906).
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Human readable title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Language of the target resource.
    pub fn hreflang(&self) -> Option<&str> {
        self.hreflang.as_deref()
    }

    /// Client this link was fetched with, if any.
    pub fn origin(&self) -> Option<&OriginRef> {
        self.origin.as_ref()
    }

    /// The href resolved against [`Link::base`], without template expansion.
    pub fn resolved_href(&self) -> HalResult<String> {
        absolutize(&self.href, Some(&self.base))
    }

    /// Computes the URL this link points to.
    ///
    /// Templated links are expanded with `variables` first (undefined
    /// variables expand to nothing); the result is resolved against
    /// [`Link::base`].
    pub fn expand(&self, variables: &UriVariables) -> HalResult<String> {
        if !self.templated {
            return self.resolved_href();
        }
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| HalError::uri_template(&self.href, "not a valid URI template"))?;
        let context = variables.to_context();
        let expanded = template
            .expand::<UriSpec, _>(&context)
            .map_err(|e| HalError::uri_template(&self.href, e.to_string()))?
            .to_string();
        absolutize(&expanded, Some(&self.base))
    }
}

/// Value bound to a URI template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    /// A single string value.
    Single(String),
    /// A list value (exploded with `*`).
    List(Vec<String>),
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

macro_rules! impl_numeric_variable {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for VariableValue {
                fn from(value: $ty) -> Self {
                    Self::Single(value.to_string())
                }
            }

            impl From<Vec<$ty>> for VariableValue {
                fn from(values: Vec<$ty>) -> Self {
                    Self::List(values.iter().map(ToString::to_string).collect())
                }
            }
        )*
    };
}

impl_numeric_variable!(i32, i64, u32, u64, usize);

impl From<Vec<String>> for VariableValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for VariableValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Variables used to expand templated links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriVariables {
    values: IndexMap<String, VariableValue>,
}

impl UriVariables {
    /// Creates an empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<VariableValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.values.get(name)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn to_context(&self) -> SimpleContext {
        let mut context = SimpleContext::new();
        for (name, value) in &self.values {
            let value = match value {
                VariableValue::Single(single) => Value::String(single.clone()),
                VariableValue::List(list) => Value::List(list.clone()),
            };
            context.insert(name.clone(), value);
        }
        context
    }
}

impl<K, V> FromIterator<(K, V)> for UriVariables
where
    K: Into<String>,
    V: Into<VariableValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Self::new();
        for (name, value) in iter {
            variables.insert(name, value);
        }
        variables
    }
}
