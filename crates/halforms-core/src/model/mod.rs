//! Resource graph model.
//!
//! The parser turns a document into a tree of immutable values:
//!
//! ```text
//! Resource ──┬── links:     rel → OneOrMany<Link>
//!            ├── embedded:  rel → OneOrMany<Resource>
//!            └── templates: key → Template ── properties: Vec<Property>
//! ```
//!
//! A relation keeps the cardinality it was declared with: an array in the
//! document is [`OneOrMany::Many`] even with a single element, an object is
//! [`OneOrMany::One`]. Accessors on [`Resource`] refuse to silently convert
//! between the two.

mod link;
mod origin;
mod resource;
mod template;

pub use link::{Link, UriVariables, VariableValue};
pub use origin::OriginRef;
pub use resource::{Resource, ResourceParts, SELF_REL};
pub use template::{Property, PropertyType, Template, DEFAULT_CONTENT_TYPE, DEFAULT_METHOD};

/// A relation value: a single entry or an ordered sequence of entries.
#[derive(Debug, Clone)]
pub enum OneOrMany<T> {
    /// Declared as a single object.
    One(T),
    /// Declared as an array (possibly of length one, possibly empty).
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Returns true if the relation was declared as an array.
    pub const fn is_multivalued(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Returns the entries as a slice, a single entry becoming a slice of one.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if this is an empty array.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_is_a_slice_of_one() {
        let one = OneOrMany::One(7);
        assert!(!one.is_multivalued());
        assert_eq!(one.as_slice(), &[7]);
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_many_keeps_cardinality_with_single_element() {
        let many = OneOrMany::Many(vec![7]);
        assert!(many.is_multivalued());
        assert_eq!(many.len(), 1);
        assert_eq!((&many).into_iter().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_empty_many() {
        let many: OneOrMany<u8> = OneOrMany::Many(Vec::new());
        assert!(many.is_empty());
        assert!(many.is_multivalued());
    }
}
