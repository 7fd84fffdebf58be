//! HAL-FORMS resources.

use crate::error::{HalError, HalResult};
use crate::model::link::Link;
use crate::model::template::Template;
use crate::model::OneOrMany;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Relation of a root resource.
pub const SELF_REL: &str = "self";

/// Everything a [`Resource`] is built from.
#[derive(Debug, Clone, Default)]
pub struct ResourceParts {
    /// Relation under which the resource was reached.
    pub rel: String,
    /// Absolute self URL.
    pub self_href: String,
    /// Application payload, reserved keys removed.
    pub content: Option<Value>,
    /// Links by relation.
    pub links: IndexMap<String, OneOrMany<Link>>,
    /// Embedded resources by relation.
    pub embedded: IndexMap<String, OneOrMany<Resource>>,
    /// Templates by key.
    pub templates: IndexMap<String, Template>,
}

/// A node of the resource graph.
///
/// A resource is immutable once built. Lookups that return several entries
/// return `None` rather than an empty vector when nothing matches.
///
/// # Cardinality
///
/// | Accessor | relation declared as object | relation declared as array |
/// |---|---|---|
/// | [`link`](Resource::link) / [`embedded`](Resource::embedded) | the entry | error |
/// | [`links`](Resource::links) / [`embeddeds`](Resource::embeddeds) | error | the entries |
/// | [`link_named`](Resource::link_named) | filtered as a list of one | filtered |
#[derive(Debug, Clone)]
pub struct Resource {
    rel: String,
    self_href: String,
    content: Option<Value>,
    links: IndexMap<String, OneOrMany<Link>>,
    embedded: IndexMap<String, OneOrMany<Resource>>,
    templates: IndexMap<String, Template>,
}

impl Resource {
    /// Assembles a resource.
    pub fn new(parts: ResourceParts) -> Self {
        let ResourceParts {
            rel,
            self_href,
            content,
            links,
            embedded,
            templates,
        } = parts;
        Self {
            rel,
            self_href,
            content,
            links,
            embedded,
            templates,
        }
    }

    /// Root resource of a response that carries no document.
    pub fn no_content(base: impl Into<String>) -> Self {
        Self::new(ResourceParts {
            rel: SELF_REL.to_string(),
            self_href: base.into(),
            ..ResourceParts::default()
        })
    }

    /// Relation under which this resource was reached, `self` for the root.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Absolute URL of this resource.
    pub fn self_href(&self) -> &str {
        &self.self_href
    }

    /// Application payload.
    pub fn content(&self) -> Option<&Value> {
        self.content.as_ref()
    }

    /// Deserializes the payload into `T`; `None` if there is no payload.
    pub fn content_as<T: DeserializeOwned>(&self) -> HalResult<Option<T>> {
        self.content
            .as_ref()
            .map(|content| T::deserialize(content).map_err(HalError::from))
            .transpose()
    }

    /// The single link for `rel`.
    ///
    /// Fails with [`HalError::MultivaluedLink`] if `rel` is declared as an
    /// array, whatever its length.
    pub fn link(&self, rel: &str) -> HalResult<Option<&Link>> {
        match self.links.get(rel) {
            None => Ok(None),
            Some(OneOrMany::One(link)) => Ok(Some(link)),
            Some(OneOrMany::Many(_)) => Err(HalError::multivalued_link(rel)),
        }
    }

    /// The link for `rel` whose name is `name`.
    ///
    /// Works on both cardinalities. Fails with [`HalError::AmbiguousName`]
    /// if more than one link matches.
    pub fn link_named(&self, rel: &str, name: &str) -> HalResult<Option<&Link>> {
        let Some(links) = self.links.get(rel) else {
            return Ok(None);
        };
        let matches = filter_named(links.iter(), |link| link.name() == Some(name));
        unique(matches).map_err(|count| HalError::ambiguous_name(rel, name, count))
    }

    /// The links declared as an array for `rel`.
    ///
    /// Fails with [`HalError::MonovaluedLink`] if `rel` is a single object.
    pub fn links(&self, rel: &str) -> HalResult<Option<Vec<&Link>>> {
        self.many_links(rel, |_| true)
    }

    /// The links of the array `rel` whose name is `name`.
    pub fn links_named(&self, rel: &str, name: &str) -> HalResult<Option<Vec<&Link>>> {
        self.many_links(rel, |link| link.name() == Some(name))
    }

    /// Every link of every relation, in document order.
    pub fn all_links(&self) -> Option<Vec<&Link>> {
        non_empty(self.links.values().flatten().collect())
    }

    /// The single embedded resource for `rel`.
    ///
    /// Fails with [`HalError::MultivaluedEmbedded`] if `rel` is declared as an
    /// array.
    pub fn embedded(&self, rel: &str) -> HalResult<Option<&Resource>> {
        match self.embedded.get(rel) {
            None => Ok(None),
            Some(OneOrMany::One(resource)) => Ok(Some(resource)),
            Some(OneOrMany::Many(_)) => Err(HalError::multivalued_embedded(rel)),
        }
    }

    /// The embedded resources declared as an array for `rel`.
    ///
    /// Fails with [`HalError::MonovaluedEmbedded`] if `rel` is a single object.
    pub fn embeddeds(&self, rel: &str) -> HalResult<Option<Vec<&Resource>>> {
        self.many_embedded(rel, |_| true)
    }

    /// The embedded resources of the array `rel` whose `self` link is named
    /// `name`.
    pub fn embeddeds_named(&self, rel: &str, name: &str) -> HalResult<Option<Vec<&Resource>>> {
        self.many_embedded(rel, |resource| resource.self_name() == Some(name))
    }

    /// Every embedded resource of every relation, in document order.
    pub fn all_embedded(&self) -> Option<Vec<&Resource>> {
        non_empty(self.embedded.values().flatten().collect())
    }

    /// The template with key `key`.
    pub fn template(&self, key: &str) -> Option<&Template> {
        self.templates.get(key)
    }

    /// Every template, in document order.
    pub fn templates(&self) -> Option<Vec<&Template>> {
        non_empty(self.templates.values().collect())
    }

    /// Raw link map.
    pub fn link_map(&self) -> &IndexMap<String, OneOrMany<Link>> {
        &self.links
    }

    /// Raw embedded map.
    pub fn embedded_map(&self) -> &IndexMap<String, OneOrMany<Resource>> {
        &self.embedded
    }

    fn self_name(&self) -> Option<&str> {
        match self.links.get(SELF_REL)? {
            OneOrMany::One(link) => link.name(),
            OneOrMany::Many(_) => None,
        }
    }

    fn many_links(
        &self,
        rel: &str,
        keep: impl Fn(&Link) -> bool,
    ) -> HalResult<Option<Vec<&Link>>> {
        match self.links.get(rel) {
            None => Ok(None),
            Some(OneOrMany::One(_)) => Err(HalError::monovalued_link(rel)),
            Some(OneOrMany::Many(links)) => Ok(non_empty(filter_named(links.iter(), keep))),
        }
    }

    fn many_embedded(
        &self,
        rel: &str,
        keep: impl Fn(&Resource) -> bool,
    ) -> HalResult<Option<Vec<&Resource>>> {
        match self.embedded.get(rel) {
            None => Ok(None),
            Some(OneOrMany::One(_)) => Err(HalError::monovalued_embedded(rel)),
            Some(OneOrMany::Many(resources)) => {
                Ok(non_empty(filter_named(resources.iter(), keep)))
            }
        }
    }
}

fn filter_named<'a, T>(
    items: impl Iterator<Item = &'a T>,
    keep: impl Fn(&T) -> bool,
) -> Vec<&'a T>
where
    T: 'a,
{
    items.filter(|item| keep(*item)).collect()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Zero or one match, or the number of matches.
fn unique<T>(mut items: Vec<T>) -> Result<Option<T>, usize> {
    match items.len() {
        0 | 1 => Ok(items.pop()),
        count => Err(count),
    }
}
