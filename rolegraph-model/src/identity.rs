//! # Identity
//!
//! Entity identity for roles and permissions.
//!
//! Persisted entities compare by their externally assigned id. Entities
//! created without an id receive a process-unique transient token instead,
//! so they compare equal only to themselves (and to clones of their handle).

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static NEXT_TRANSIENT: AtomicU64 = AtomicU64::new(1);

/// The identity an entity is compared and hashed by.
///
/// # Example
///
/// ```
/// use rolegraph_model::EntityKey;
/// use uuid::Uuid;
///
/// let id = Uuid::now_v7();
/// assert_eq!(EntityKey::persisted(id), EntityKey::persisted(id));
/// assert_ne!(EntityKey::transient(), EntityKey::transient());
/// ```
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntityKey {
    /// Identity backed by an externally assigned id.
    Persisted(Uuid),
    /// Identity of an entity that has no id; unique within this process.
    Transient(u64),
}

impl EntityKey {
    /// Key for an entity with an assigned id.
    pub fn persisted(id: Uuid) -> Self {
        EntityKey::Persisted(id)
    }

    /// Issue a fresh transient key. Every call returns a distinct key.
    pub fn transient() -> Self {
        EntityKey::Transient(NEXT_TRANSIENT.fetch_add(1, Ordering::Relaxed))
    }

    /// Key for an optional id: persisted when present, a fresh transient key otherwise.
    pub fn from_id(id: Option<Uuid>) -> Self {
        match id {
            Some(id) => Self::persisted(id),
            None => Self::transient(),
        }
    }

    /// The external id, if this key is persisted.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            EntityKey::Persisted(id) => Some(*id),
            EntityKey::Transient(_) => None,
        }
    }

    /// Check if this key is backed by an external id.
    pub fn is_persisted(&self) -> bool {
        matches!(self, EntityKey::Persisted(_))
    }

    /// Check if this key is a transient token.
    pub fn is_transient(&self) -> bool {
        matches!(self, EntityKey::Transient(_))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Persisted(id) => write!(f, "{}", id),
            EntityKey::Transient(token) => write!(f, "transient#{}", token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_keys_compare_by_id() {
        let id = Uuid::now_v7();
        assert_eq!(EntityKey::persisted(id), EntityKey::from_id(Some(id)));
        assert_ne!(EntityKey::persisted(id), EntityKey::persisted(Uuid::now_v7()));
    }

    #[test]
    fn test_transient_keys_are_unique() {
        let a = EntityKey::from_id(None);
        let b = EntityKey::from_id(None);
        assert_ne!(a, b);
        assert_eq!(a, a);
        assert!(a.is_transient());
        assert!(a.id().is_none());
    }

    #[test]
    fn test_persisted_never_equals_transient() {
        let persisted = EntityKey::persisted(Uuid::now_v7());
        let transient = EntityKey::transient();
        assert_ne!(persisted, transient);
        assert!(persisted.is_persisted());
    }

    #[test]
    fn test_display() {
        let id = Uuid::now_v7();
        assert_eq!(EntityKey::persisted(id).to_string(), id.to_string());
        assert!(EntityKey::transient().to_string().starts_with("transient#"));
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(EntityKey::Transient(7)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "transient", "value": 7}));
    }
}
