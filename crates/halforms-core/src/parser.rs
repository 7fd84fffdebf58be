//! Document parser.
//!
//! Turns a JSON document into a [`Resource`] graph. The parser is a tolerant
//! reader: malformed fragments are logged and dropped, the document as a
//! whole never fails to parse once it is valid JSON.
//!
//! # Resolution bases
//!
//! Relative references are resolved against a base threaded explicitly
//! through the recursion:
//!
//! - the `self` link of a resource resolves against the base the resource
//!   was reached with (the request URL for the root, the parent's self href
//!   for an embedded resource);
//! - every other link, every embedded resource and every template resolves
//!   against the resource's own self href.

use crate::error::{HalError, HalResult};
use crate::model::{
    Link, OneOrMany, OriginRef, Property, PropertyType, Resource, ResourceParts, Template,
    SELF_REL,
};
use crate::uri::absolutize;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Reserved key holding links.
pub const LINKS_KEY: &str = "_links";

/// Reserved key holding embedded resources.
pub const EMBEDDED_KEY: &str = "_embedded";

/// Reserved key holding templates.
pub const TEMPLATES_KEY: &str = "_templates";

/// Why a fragment of a document was dropped.
#[derive(Debug, Error)]
enum Skipped {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("link has no href")]
    MissingHref,
    #[error("property has no name")]
    MissingName,
    #[error("target cannot be resolved: {0}")]
    Unresolvable(#[source] HalError),
}

/// Parses documents into resource graphs.
///
/// A parser built with [`DocumentParser::with_origin`] attaches the given
/// client handle to every link and template it creates.
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    origin: Option<OriginRef>,
}

impl DocumentParser {
    /// Creates a parser that attaches no origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser attaching `origin` to links and templates.
    pub fn with_origin(origin: OriginRef) -> Self {
        Self {
            origin: Some(origin),
        }
    }

    /// Parses `document` fetched from `base`.
    pub fn parse(&self, base: &str, document: Value) -> Resource {
        self.parse_resource(base, SELF_REL, document)
    }

    /// Decodes `body` as JSON and parses it.
    pub fn parse_slice(&self, base: &str, body: &[u8]) -> HalResult<Resource> {
        let document: Value = serde_json::from_slice(body)?;
        Ok(self.parse(base, document))
    }

    fn parse_resource(&self, base: &str, rel: &str, body: Value) -> Resource {
        let Value::Object(mut body) = body else {
            debug!(rel, "embedded value is not an object, keeping it as content");
            return Resource::new(ResourceParts {
                rel: rel.to_string(),
                self_href: base.to_string(),
                content: Some(body),
                ..ResourceParts::default()
            });
        };

        let links = reserved_object(&mut body, LINKS_KEY);
        let embedded = reserved_object(&mut body, EMBEDDED_KEY);
        let templates = reserved_object(&mut body, TEMPLATES_KEY);

        let self_href = resolve_self(base, &links);
        let links = self.parse_links(base, &self_href, links);
        let embedded = self.parse_embedded(&self_href, embedded);
        let templates = self.parse_templates(&self_href, &links, templates);

        Resource::new(ResourceParts {
            rel: rel.to_string(),
            self_href,
            content: Some(Value::Object(body)),
            links,
            embedded,
            templates,
        })
    }

    fn parse_links(
        &self,
        base: &str,
        self_href: &str,
        links: Map<String, Value>,
    ) -> IndexMap<String, OneOrMany<Link>> {
        let mut result = IndexMap::with_capacity(links.len());
        for (rel, value) in links {
            let context = if rel == SELF_REL { base } else { self_href };
            match value {
                Value::Array(items) => {
                    let converted = items
                        .into_iter()
                        .filter_map(|item| kept("link", &rel, self.convert_link(&rel, context, item)))
                        .collect();
                    result.insert(rel, OneOrMany::Many(converted));
                }
                item => {
                    if let Some(link) = kept("link", &rel, self.convert_link(&rel, context, item)) {
                        result.insert(rel, OneOrMany::One(link));
                    }
                }
            }
        }
        result
    }

    fn convert_link(&self, rel: &str, base: &str, value: Value) -> Result<Link, Skipped> {
        let Value::Object(fields) = value else {
            return Err(Skipped::NotAnObject);
        };
        let href = string_field(&fields, "href")
            .filter(|href| !href.is_empty())
            .ok_or(Skipped::MissingHref)?;
        Ok(Link::new(rel, href, base)
            .with_templated(truthy(fields.get("templated")))
            .with_media_type(string_field(&fields, "type"))
            .with_deprecation(string_field(&fields, "deprecation"))
            .with_name(string_field(&fields, "name"))
            .with_profile(string_field(&fields, "profile"))
            .with_title(string_field(&fields, "title"))
            .with_hreflang(string_field(&fields, "hreflang"))
            .with_origin(self.origin.clone()))
    }

    fn parse_embedded(
        &self,
        self_href: &str,
        embedded: Map<String, Value>,
    ) -> IndexMap<String, OneOrMany<Resource>> {
        let mut result = IndexMap::with_capacity(embedded.len());
        for (rel, value) in embedded {
            match value {
                Value::Null => debug!(rel = %rel, "ignoring null embedded"),
                Value::Array(items) => {
                    let resources = items
                        .into_iter()
                        .filter(|item| !item.is_null())
                        .map(|item| self.parse_resource(self_href, &rel, item))
                        .collect();
                    result.insert(rel, OneOrMany::Many(resources));
                }
                item => {
                    let resource = self.parse_resource(self_href, &rel, item);
                    result.insert(rel, OneOrMany::One(resource));
                }
            }
        }
        result
    }

    fn parse_templates(
        &self,
        self_href: &str,
        links: &IndexMap<String, OneOrMany<Link>>,
        templates: Map<String, Value>,
    ) -> IndexMap<String, Template> {
        let mut result = IndexMap::with_capacity(templates.len());
        for (key, value) in templates {
            let fields = match value {
                Value::Null => continue,
                Value::Object(fields) => fields,
                _ => {
                    warn!(rel = %key, reason = %Skipped::NotAnObject, "ignoring malformed template");
                    continue;
                }
            };
            let converted = self.convert_template(&key, self_href, links, &fields);
            if let Some(template) = kept("template", &key, converted) {
                result.insert(key, template);
            }
        }
        result
    }

    fn convert_template(
        &self,
        key: &str,
        self_href: &str,
        links: &IndexMap<String, OneOrMany<Link>>,
        fields: &Map<String, Value>,
    ) -> Result<Template, Skipped> {
        let target = string_field(fields, "target");
        let resolved_url = resolve_target(target.as_deref(), self_href, links)
            .map_err(Skipped::Unresolvable)?;

        let properties = match fields.get("properties") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| kept("property", key, convert_property(item)))
                .collect(),
            _ => Vec::new(),
        };

        let mut template = Template::new(key, resolved_url)
            .with_target(target)
            .with_title(string_field(fields, "title"))
            .with_properties(properties)
            .with_origin(self.origin.clone());
        if let Some(method) = string_field(fields, "method") {
            template = template.with_method(method);
        }
        if let Some(content_type) = string_field(fields, "contentType") {
            template = template.with_content_type(content_type);
        }
        Ok(template)
    }
}

/// Parses `document` fetched from `base` with no origin attached.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let resource = halforms_core::parse(
///     "https://hal.test/orders",
///     json!({ "_links": { "next": { "href": "?page=2" } }, "total": 3 }),
/// );
/// let next = resource.link("next").unwrap().unwrap();
/// assert_eq!(next.resolved_href().unwrap(), "https://hal.test/orders?page=2");
/// assert_eq!(resource.content().unwrap()["total"], 3);
/// ```
pub fn parse(base: &str, document: Value) -> Resource {
    DocumentParser::new().parse(base, document)
}

fn convert_property(value: &Value) -> Result<Property, Skipped> {
    let Value::Object(fields) = value else {
        return Err(Skipped::NotAnObject);
    };
    let name = string_field(fields, "name")
        .filter(|name| !name.is_empty())
        .ok_or(Skipped::MissingName)?;

    let property_type = fields
        .get("type")
        .and_then(Value::as_str)
        .and_then(PropertyType::from_name)
        .unwrap_or_default();

    // Patterns are ECMAScript; those outside the `regex` crate's syntax are dropped.
    let regex = string_field(fields, "regex").and_then(|pattern| match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!(property = %name, pattern = %pattern, error = %e, "ignoring invalid regex");
            None
        }
    });

    let mut property = Property::new(name)
        .with_type(property_type)
        .with_read_only(truthy(fields.get("readOnly")))
        .with_required(truthy(fields.get("required")))
        .with_templated(truthy(fields.get("templated")))
        .with_regex(regex)
        .with_value(fields.get("value").filter(|v| !v.is_null()).cloned());
    if let Some(prompt) = string_field(fields, "prompt") {
        property = property.with_prompt(prompt);
    }
    Ok(property)
}

/// Removes a reserved key; anything but an object is ignored.
fn reserved_object(body: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match body.shift_remove(key) {
        Some(Value::Object(fields)) => fields,
        None | Some(Value::Null) => Map::new(),
        Some(_) => {
            warn!(key, "ignoring reserved key that is not an object");
            Map::new()
        }
    }
}

fn resolve_self(base: &str, links: &Map<String, Value>) -> String {
    let href = links
        .get(SELF_REL)
        .and_then(|link| link.get("href"))
        .and_then(Value::as_str)
        .filter(|href| !href.is_empty());
    let Some(href) = href else {
        return base.to_string();
    };
    match absolutize(href, Some(base)) {
        Ok(self_href) => self_href,
        Err(e) => {
            warn!(href, base, error = %e, "cannot resolve self href, using base");
            base.to_string()
        }
    }
}

/// A target naming a link resolves to that link's own resolved href,
/// anything else is taken as a URI reference against `self_href`.
fn resolve_target(
    target: Option<&str>,
    self_href: &str,
    links: &IndexMap<String, OneOrMany<Link>>,
) -> HalResult<String> {
    let Some(target) = target else {
        return Ok(self_href.to_string());
    };
    match links.get(target).and_then(|links| links.iter().next()) {
        Some(link) => link.resolved_href(),
        None => absolutize(target, Some(self_href)),
    }
}

fn kept<T>(kind: &str, rel: &str, converted: Result<T, Skipped>) -> Option<T> {
    match converted {
        Ok(value) => Some(value),
        Err(reason) => {
            warn!(kind, rel, %reason, "ignoring malformed entry");
            None
        }
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Only a literal `true` or the string `"true"` count as true.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag == "true",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_self_href_resolution() {
        let resource = parse(
            "https://hal.test/orders/",
            json!({ "_links": { "self": { "href": "12" } } }),
        );
        assert_eq!(resource.self_href(), "https://hal.test/orders/12");

        let resource = parse("https://hal.test/orders/", json!({}));
        assert_eq!(resource.self_href(), "https://hal.test/orders/");
    }

    #[test]
    fn test_reserved_keys_are_stripped() {
        let resource = parse(
            "https://hal.test/",
            json!({
                "_links": { "self": { "href": "/" } },
                "_embedded": {},
                "_templates": {},
                "answer": 42
            }),
        );
        assert_eq!(resource.content(), Some(&json!({ "answer": 42 })));
    }

    #[test]
    fn test_self_uses_incoming_base_and_others_use_self_href() {
        let resource = parse(
            "https://hal.test/a/b",
            json!({
                "_links": {
                    "self": { "href": "c/d" },
                    "next": { "href": "e" }
                }
            }),
        );
        let this = resource.link("self").unwrap().unwrap();
        assert_eq!(this.base(), "https://hal.test/a/b");
        let next = resource.link("next").unwrap().unwrap();
        assert_eq!(next.base(), "https://hal.test/a/c/d");
        assert_eq!(next.resolved_href().unwrap(), "https://hal.test/a/c/e");
    }

    #[test]
    fn test_link_without_href_is_dropped() {
        let resource = parse(
            "https://hal.test/",
            json!({
                "_links": {
                    "broken": { "title": "nowhere" },
                    "empty": { "href": "" },
                    "partial": [{ "href": "/one" }, { "name": "two" }]
                }
            }),
        );
        assert!(resource.link("broken").unwrap().is_none());
        assert!(resource.link("empty").unwrap().is_none());
        assert_eq!(resource.links("partial").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_templated_is_truthy() {
        let resource = parse(
            "https://hal.test/",
            json!({
                "_links": {
                    "a": { "href": "/a{?x}", "templated": true },
                    "b": { "href": "/b{?x}", "templated": "true" },
                    "c": { "href": "/c{?x}", "templated": "false" },
                    "d": { "href": "/d{?x}", "templated": 1 }
                }
            }),
        );
        let templated = |rel: &str| resource.link(rel).unwrap().unwrap().templated();
        assert!(templated("a"));
        assert!(templated("b"));
        assert!(!templated("c"));
        assert!(!templated("d"));
    }

    #[test]
    fn test_embedded_rel_and_cardinality() {
        let resource = parse(
            "https://hal.test/",
            json!({
                "_embedded": {
                    "one": { "id": 1 },
                    "many": [{ "id": 2 }, null, { "id": 3 }],
                    "scalar": 7,
                    "nothing": null
                }
            }),
        );
        let one = resource.embedded("one").unwrap().unwrap();
        assert_eq!(one.rel(), "one");
        let many = resource.embeddeds("many").unwrap().unwrap();
        assert_eq!(many.len(), 2);
        assert!(many.iter().all(|r| r.rel() == "many"));
        let scalar = resource.embedded("scalar").unwrap().unwrap();
        assert_eq!(scalar.content(), Some(&json!(7)));
        assert!(resource.embedded("nothing").unwrap().is_none());
    }

    #[test]
    fn test_template_target_resolution() {
        let resource = parse(
            "https://hal.test/",
            json!({
                "_links": {
                    "self": { "href": "/foo/1" },
                    "edit": { "href": "edit" },
                    "alternates": [{ "href": "/alt/1" }, { "href": "/alt/2" }]
                },
                "_templates": {
                    "default": {},
                    "byLink": { "target": "edit" },
                    "byArray": { "target": "alternates" },
                    "byUri": { "target": "/bar" },
                    "absolute": { "target": "https://other.test/x" }
                }
            }),
        );
        let url = |key: &str| resource.template(key).unwrap().resolved_url().to_string();
        assert_eq!(url("default"), "https://hal.test/foo/1");
        assert_eq!(url("byLink"), "https://hal.test/foo/edit");
        assert_eq!(url("byArray"), "https://hal.test/alt/1");
        assert_eq!(url("byUri"), "https://hal.test/bar");
        assert_eq!(url("absolute"), "https://other.test/x");
        assert_eq!(resource.template("byLink").unwrap().target(), Some("edit"));
    }

    #[test]
    fn test_template_targeting_self_matches_self_href() {
        let resource = parse(
            "https://h.test/a/",
            json!({
                "_links": { "self": { "href": "b/c" } },
                "_templates": { "default": { "target": "self" } }
            }),
        );
        assert_eq!(resource.self_href(), "https://h.test/a/b/c");
        assert_eq!(
            resource.template("default").unwrap().resolved_url(),
            "https://h.test/a/b/c"
        );
    }

    #[test]
    fn test_null_and_invalid_templates_are_skipped() {
        let resource = parse(
            "https://hal.test/",
            json!({ "_templates": { "default": {}, "delete": null, "odd": "nope" } }),
        );
        assert_eq!(resource.templates().unwrap().len(), 1);
        assert!(resource.template("delete").is_none());
        assert!(resource.template("odd").is_none());
    }

    #[test]
    fn test_property_conversion() {
        let resource = parse(
            "https://hal.test/",
            json!({
                "_templates": {
                    "default": {
                        "properties": [
                            { "name": "basic" },
                            { "key": "ignored" },
                            { "name": "flags", "readOnly": "true", "required": true, "templated": "yes" },
                            { "name": "notRequired", "required": "false" },
                            { "name": "zero", "required": 0 },
                            { "name": "pattern", "regex": "^\\d{13}$" },
                            { "name": "badPattern", "regex": "^($" },
                            { "name": "lookahead", "regex": "^(?=.*\\d).{8,}$" },
                            { "name": "amount", "type": "NUMBER", "value": 19 },
                            { "name": "odd", "type": "checkbox", "prompt": "Odd" }
                        ]
                    }
                }
            }),
        );
        let template = resource.template("default").unwrap();
        assert_eq!(template.properties().len(), 9);

        let basic = template.property("basic").unwrap();
        assert_eq!(basic.prompt(), "basic");
        assert_eq!(basic.property_type(), PropertyType::Text);
        assert!(!basic.required() && !basic.read_only() && !basic.templated());
        assert!(basic.value().is_none());

        let flags = template.property("flags").unwrap();
        assert!(flags.read_only());
        assert!(flags.required());
        assert!(!flags.templated());

        assert!(!template.property("notRequired").unwrap().required());
        assert!(!template.property("zero").unwrap().required());

        let pattern = template.property("pattern").unwrap();
        assert_eq!(pattern.regex().unwrap().as_str(), "^\\d{13}$");
        assert!(template.property("badPattern").unwrap().regex().is_none());
        let lookahead = template.property("lookahead").unwrap();
        assert!(lookahead.regex().is_none());
        assert!(lookahead.matches("anything"));

        let amount = template.property("amount").unwrap();
        assert_eq!(amount.property_type(), PropertyType::Number);
        assert_eq!(amount.value(), Some(&json!(19)));

        let odd = template.property("odd").unwrap();
        assert_eq!(odd.property_type(), PropertyType::Text);
        assert_eq!(odd.prompt(), "Odd");
    }

    #[test]
    fn test_parse_slice_decode_error() {
        let err = DocumentParser::new()
            .parse_slice("https://hal.test/", b"{ not json")
            .unwrap_err();
        assert!(matches!(err, HalError::Decode(_)));
    }
}
