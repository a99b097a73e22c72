use std::future::Future;

use serde::{Deserialize, Serialize};

/// Entities that expose their persisted identity.
pub trait Identify {
    /// The identifier the entity is persisted under; empty until the entity
    /// is ready.
    fn identity(&self) -> &str;
}

/// A foreign-key field holding either a raw identifier or the entity it
/// names.
///
/// Resolving replaces the identifier with the entity; the two forms are
/// never held at the same time. A resolved entity reports an identity equal
/// to the identifier it replaced.
///
/// Serialized untagged: an unresolved reference is the bare identifier
/// string, a resolved one is the entity object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef<T> {
    /// Raw identifier, not yet fetched.
    Unresolved(String),
    /// Fetched entity.
    Resolved(T),
}

impl<T: Identify> EntityRef<T> {
    /// True once the entity has been fetched.
    pub fn is_resolved(&self) -> bool {
        matches!(self, EntityRef::Resolved(_))
    }

    /// The raw identifier, regardless of state.
    pub fn identifier(&self) -> &str {
        match self {
            EntityRef::Unresolved(id) => id,
            EntityRef::Resolved(entity) => entity.identity(),
        }
    }

    /// Borrow the entity if this reference has been resolved.
    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            EntityRef::Resolved(entity) => Some(entity),
            EntityRef::Unresolved(_) => None,
        }
    }

    /// Resolve the reference, fetching at most once.
    ///
    /// `fetch` runs only while the reference is unresolved. `Ok(Some(_))`
    /// replaces the identifier with the entity; `Ok(None)` (no such row)
    /// leaves the identifier in place, so a later call may retry.
    pub async fn resolve_with<F, Fut, E>(&mut self, fetch: F) -> Result<Option<&T>, E>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if let EntityRef::Unresolved(id) = self {
            if let Some(entity) = fetch(id.clone()).await? {
                *self = EntityRef::Resolved(entity);
            }
        }
        Ok(self.as_resolved())
    }
}
