//! # Permissions
//!
//! The atomic capability type and the set type resolution produces.
//! A permission is an identified, named capability; the name is for display only.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

use crate::identity::EntityKey;

/// A named capability, shared by handle.
///
/// Cloning a `Permission` clones the handle, not the capability: every clone
/// is the same permission. Equality and hashing go through [`EntityKey`]:
///
/// - **Persisted**: two permissions with the same id are equal, whatever their names
/// - **Transient**: a permission without an id equals only itself
///
/// # Example
///
/// ```
/// use rolegraph_model::Permission;
/// use uuid::Uuid;
///
/// let id = Uuid::now_v7();
/// assert_eq!(Permission::with_id(id, "read"), Permission::with_id(id, "read (renamed)"));
///
/// let transient = Permission::new("read");
/// assert_eq!(transient, transient.clone());
/// assert_ne!(transient, Permission::new("read"));
/// ```
#[derive(Clone)]
pub struct Permission {
    inner: Arc<PermissionInner>,
}

struct PermissionInner {
    key: EntityKey,
    name: String,
}

impl Permission {
    /// Create a transient permission with no external id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(None, name)
    }

    /// Create a permission with an externally assigned id.
    ///
    /// # Arguments
    ///
    /// * `id` - The id issued by the owning store
    /// * `name` - Display name
    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self::from_parts(Some(id), name)
    }

    /// Create a permission from an optional id, as loaded from a store.
    pub fn from_parts(id: Option<Uuid>, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PermissionInner {
                key: EntityKey::from_id(id),
                name: name.into(),
            }),
        }
    }

    /// The external id, if assigned.
    pub fn id(&self) -> Option<Uuid> {
        self.inner.key.id()
    }

    /// The identity this permission compares by.
    pub fn key(&self) -> EntityKey {
        self.inner.key
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key
    }
}

impl Eq for Permission {}

impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
    }
}

impl fmt::Debug for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permission")
            .field("key", &self.inner.key)
            .field("name", &self.inner.name)
            .finish()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Permission", 2)?;
        state.serialize_field("id", &self.id())?;
        state.serialize_field("name", self.name())?;
        state.end()
    }
}

/// A set of permissions, as produced by resolution.
///
/// Membership follows permission identity, so two distinct transient
/// permissions with the same name are both kept.
///
/// # Example
///
/// ```
/// use rolegraph_model::{Permission, PermissionSet};
///
/// let read = Permission::new("read");
/// let write = Permission::new("write");
///
/// let mut set = PermissionSet::new();
/// set.insert(read.clone());
/// set.insert(write);
///
/// assert!(set.contains(&read));
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.names(), vec!["read", "write"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Add a permission to the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was not already present
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.permissions.insert(permission)
    }

    /// Remove a permission from the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(permission)
    }

    /// Check if the set contains a permission.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: PermissionSet) {
        if self.permissions.is_empty() {
            self.permissions = other.permissions;
        } else {
            self.permissions.extend(other.permissions);
        }
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Iterate over the permissions in arbitrary order.
    pub fn iter(&self) -> hash_set::Iter<'_, Permission> {
        self.permissions.iter()
    }

    /// Display names of all permissions, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .permissions
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Check if this set contains all permissions from another set.
    pub fn contains_all(&self, other: &PermissionSet) -> bool {
        other.permissions.is_subset(&self.permissions)
    }

    /// Check if this set contains any permission from another set.
    pub fn contains_any(&self, other: &PermissionSet) -> bool {
        !self.permissions.is_disjoint(&other.permissions)
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<T: IntoIterator<Item = Permission>>(&mut self, iter: T) {
        self.permissions.extend(iter);
    }
}

impl IntoIterator for PermissionSet {
    type Item = Permission;
    type IntoIter = hash_set::IntoIter<Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.into_iter()
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = hash_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}
