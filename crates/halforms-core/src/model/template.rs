//! HAL-FORMS templates and their properties.
//!
//! The HAL-FORMS draft is loose in several places; the choices made here:
//!
//! - the template key is not an attribute of the template but its key in
//!   `_templates`, so [`Template::key`] and [`Template::rel`] are the same;
//! - `target` may name a link of the owning resource or be a URI, both are
//!   supported (see the parser);
//! - property names are treated as unique per template, [`Template::property`]
//!   returns the first match.

use crate::model::origin::OriginRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default method when a template declares none.
pub const DEFAULT_METHOD: &str = "GET";

/// Default content type when a template declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// An action that can be invoked on a resource.
#[derive(Debug, Clone)]
pub struct Template {
    key: String,
    content_type: String,
    method: String,
    resolved_url: String,
    target: Option<String>,
    title: Option<String>,
    properties: Vec<Property>,
    origin: Option<OriginRef>,
}

impl Template {
    /// Creates a template with default method and content type.
    pub fn new(key: impl Into<String>, resolved_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            method: DEFAULT_METHOD.to_string(),
            resolved_url: resolved_url.into(),
            target: None,
            title: None,
            properties: Vec::new(),
            origin: None,
        }
    }

    /// Sets the method used on invocation.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the content type of the submitted payload.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the raw target reference.
    #[must_use]
    pub fn with_target(mut self, target: Option<String>) -> Self {
        self.target = target;
        self
    }

    /// Sets the human readable title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Sets the properties, in document order.
    #[must_use]
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    /// Attaches the client this template was fetched with.
    #[must_use]
    pub fn with_origin(mut self, origin: Option<OriginRef>) -> Self {
        self.origin = origin;
        self
    }

    /// Key of this template in `_templates`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Relation of this template to its resource; same as [`Template::key`].
    /// The special value `default` names the default action.
    pub fn rel(&self) -> &str {
        &self.key
    }

    /// Content type of the payload to submit.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Method used to invoke this template.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Absolute URL the template is invoked on, computed at parse time.
    pub fn resolved_url(&self) -> &str {
        &self.resolved_url
    }

    /// Raw `target` as found in the document.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Human readable title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Properties to submit, in document order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// First property named `name`.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Client this template was fetched with, if any.
    pub fn origin(&self) -> Option<&OriginRef> {
        self.origin.as_ref()
    }
}

/// Kind of form field a property is rendered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    /// Hidden field.
    Hidden,
    /// Single line text, the fallback for unknown types.
    #[default]
    Text,
    /// Multi-line text.
    Textarea,
    /// Search field.
    Search,
    /// Telephone number.
    Tel,
    /// URL.
    Url,
    /// Email address.
    Email,
    /// Password.
    Password,
    /// Date.
    Date,
    /// Month.
    Month,
    /// Week.
    Week,
    /// Time.
    Time,
    /// Local date and time.
    DatetimeLocal,
    /// Number.
    Number,
    /// Range.
    Range,
    /// Color.
    Color,
}

impl PropertyType {
    /// All known property types.
    pub const ALL: [Self; 16] = [
        Self::Hidden,
        Self::Text,
        Self::Textarea,
        Self::Search,
        Self::Tel,
        Self::Url,
        Self::Email,
        Self::Password,
        Self::Date,
        Self::Month,
        Self::Week,
        Self::Time,
        Self::DatetimeLocal,
        Self::Number,
        Self::Range,
        Self::Color,
    ];

    /// Wire name of this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Search => "search",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Email => "email",
            Self::Password => "password",
            Self::Date => "date",
            Self::Month => "month",
            Self::Week => "week",
            Self::Time => "time",
            Self::DatetimeLocal => "datetime-local",
            Self::Number => "number",
            Self::Range => "range",
            Self::Color => "color",
        }
    }

    /// Looks up a type by wire name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter accepted by a template.
///
/// Constraints (`required`, `regex`, `type`) are exposed for callers to act
/// on; nothing in this crate validates payloads against them.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    property_type: PropertyType,
    prompt: String,
    read_only: bool,
    required: bool,
    templated: bool,
    regex: Option<Regex>,
    value: Option<Value>,
}

impl Property {
    /// Creates a text property prompted with its own name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            prompt: name.clone(),
            name,
            property_type: PropertyType::Text,
            read_only: false,
            required: false,
            templated: false,
            regex: None,
            value: None,
        }
    }

    /// Sets the field kind.
    #[must_use]
    pub fn with_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the read-only flag.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the required flag.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the templated flag.
    #[must_use]
    pub fn with_templated(mut self, templated: bool) -> Self {
        self.templated = templated;
        self
    }

    /// Sets the validation pattern.
    #[must_use]
    pub fn with_regex(mut self, regex: Option<Regex>) -> Self {
        self.regex = regex;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_value(mut self, value: Option<Value>) -> Self {
        self.value = value;
        self
    }

    /// Name, unique within its template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind.
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Human readable prompt, the name when none was declared.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Whether the value should only be displayed.
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the value must be sent on invocation.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether the value is a URI template.
    pub fn templated(&self) -> bool {
        self.templated
    }

    /// Pattern the value must match, if one was declared and compiles.
    ///
    /// Only the `regex` crate's syntax is supported. ECMAScript-only
    /// constructs such as lookaheads or backreferences fail to compile, so
    /// the parser logs a warning and the property carries no pattern.
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// Initial value.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns true if `candidate` satisfies the declared pattern (or there is none).
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.as_ref().map_or(true, |regex| regex.is_match(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_defaults() {
        let template = Template::new("default", "https://hal.test/foo/1");
        assert_eq!(template.key(), "default");
        assert_eq!(template.rel(), "default");
        assert_eq!(template.method(), "GET");
        assert_eq!(template.content_type(), "application/json");
        assert!(template.target().is_none());
        assert!(template.properties().is_empty());
    }

    #[test]
    fn test_property_lookup_returns_first_match() {
        let template = Template::new("default", "/").with_properties(vec![
            Property::new("id").with_prompt("first"),
            Property::new("id").with_prompt("second"),
        ]);
        assert_eq!(template.property("id").unwrap().prompt(), "first");
        assert!(template.property("missing").is_none());
    }

    #[test]
    fn test_property_type_names() {
        assert_eq!(PropertyType::from_name("number"), Some(PropertyType::Number));
        assert_eq!(PropertyType::from_name("NUMBER"), Some(PropertyType::Number));
        assert_eq!(
            PropertyType::from_name("datetime-local"),
            Some(PropertyType::DatetimeLocal)
        );
        assert_eq!(PropertyType::from_name("checkbox"), None);
        for ty in PropertyType::ALL {
            assert_eq!(PropertyType::from_name(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn test_property_type_serde_names() {
        let json = serde_json::to_string(&PropertyType::DatetimeLocal).unwrap();
        assert_eq!(json, "\"datetime-local\"");
    }

    #[test]
    fn test_property_defaults_and_pattern() {
        let property = Property::new("isbn");
        assert_eq!(property.prompt(), "isbn");
        assert_eq!(property.property_type(), PropertyType::Text);
        assert!(property.matches("anything"));

        let property = property.with_regex(Regex::new(r"^\d{13}$").ok());
        assert!(property.matches("9780451450524"));
        assert!(!property.matches("978"));
    }
}
