//! Weak back-reference from parsed values to the client that fetched them.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// Non-owning handle to the client a document was fetched with.
///
/// Links and templates keep one so they can be followed without naming a
/// client explicitly. The handle never keeps the client alive; once the
/// client is dropped [`OriginRef::upgrade`] returns `None`.
#[derive(Clone)]
pub struct OriginRef(Weak<dyn Any + Send + Sync>);

impl OriginRef {
    /// Creates a handle pointing at `origin`.
    pub fn new<T: Any + Send + Sync>(origin: &Arc<T>) -> Self {
        let weak: Weak<T> = Arc::downgrade(origin);
        Self(weak)
    }

    /// Returns the origin if it is still alive and of type `T`.
    pub fn upgrade<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0.upgrade()?.downcast::<T>().ok()
    }
}

impl fmt::Debug for OriginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginRef")
            .field("alive", &(self.0.strong_count() > 0))
            .finish()
    }
}
