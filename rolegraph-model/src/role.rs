//! Role graph nodes
//!
//! A role is a named node that includes other roles and carries a local map
//! from permission to [`PermissionStatus`]. The inclusion graph may contain
//! cycles, including a role that includes itself; walking it safely is the
//! resolver's job, not the model's.
//!
//! Roles reference their sub-roles without owning them. Whoever created a
//! role (a registry, a store, a test) keeps it alive; a sub-role that has been
//! dropped by its owner simply stops being part of the graph.

use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};
use uuid::Uuid;

use crate::identity::EntityKey;
use crate::permission::Permission;
use crate::status::PermissionStatus;

/// A node in the role inclusion graph, shared by handle.
///
/// Cloning a `Role` clones the handle; mutations through any clone are seen
/// by all of them. Equality and hashing follow [`EntityKey`], the same rule
/// as [`Permission`].
///
/// # Examples
///
/// ```
/// use rolegraph_model::{Permission, PermissionStatus, Role};
///
/// let read = Permission::new("document:read");
/// let viewer = Role::new("viewer");
/// viewer.add_permission(&read, PermissionStatus::Allow);
///
/// let editor = Role::new("editor");
/// assert!(editor.add_role(&viewer));
/// assert!(editor.includes_role(&viewer));
/// assert_eq!(viewer.permission_status(&read), Some(PermissionStatus::Allow));
/// ```
#[derive(Clone)]
pub struct Role {
    inner: Arc<RoleInner>,
}

/// A non-owning reference to a role, as held in another role's inclusion set.
#[derive(Clone)]
pub struct WeakRole {
    key: EntityKey,
    inner: Weak<RoleInner>,
}

struct RoleInner {
    key: EntityKey,
    name: String,
    state: RwLock<RoleState>,
}

#[derive(Default)]
struct RoleState {
    included_roles: HashMap<EntityKey, Weak<RoleInner>>,
    included_permissions: HashMap<Permission, PermissionStatus>,
}

impl Role {
    /// Create a transient role with no external id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(None, name)
    }

    /// Create a role with an externally assigned id.
    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self::from_parts(Some(id), name)
    }

    /// Create a role from an optional id, as loaded from a store.
    pub fn from_parts(id: Option<Uuid>, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RoleInner {
                key: EntityKey::from_id(id),
                name: name.into(),
                state: RwLock::new(RoleState::default()),
            }),
        }
    }

    /// The external id, if assigned.
    pub fn id(&self) -> Option<Uuid> {
        self.inner.key.id()
    }

    /// The identity this role compares by.
    pub fn key(&self) -> EntityKey {
        self.inner.key
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Include another role.
    ///
    /// No cycle check is made: a role may include itself or one of its
    /// ancestors. Only this role's state changes.
    ///
    /// The link does not keep `other` alive. The caller must hold `other`
    /// (or a clone of it) for as long as it should count as included; a
    /// builder that returns only the top role leaves a graph with no
    /// sub-roles.
    ///
    /// If a role with the same identity is already included through a live
    /// handle, that link is kept and `other` is not stored. A link whose
    /// role has been dropped is replaced.
    ///
    /// # Returns
    ///
    /// `true` if `other` is now included, whether it was just added or
    /// already present.
    pub fn add_role(&self, other: &Role) -> bool {
        let mut state = self.inner.state.write();
        match state.included_roles.entry(other.key()) {
            Entry::Occupied(mut existing) => {
                if existing.get().strong_count() == 0 {
                    existing.insert(Arc::downgrade(&other.inner));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::downgrade(&other.inner));
            }
        }
        state.included_roles.contains_key(&other.key())
    }

    /// Stop including another role. Removing a role that is not included is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if `other` is now absent.
    pub fn remove_role(&self, other: &Role) -> bool {
        let mut state = self.inner.state.write();
        state.included_roles.remove(&other.key());
        !state.included_roles.contains_key(&other.key())
    }

    /// Set the local status for a permission, overwriting any previous status.
    ///
    /// # Arguments
    ///
    /// * `permission` - The permission to grant or deny
    /// * `status` - The new local status
    ///
    /// # Returns
    ///
    /// `true` if the local map now holds an entry for `permission`.
    pub fn add_permission(&self, permission: &Permission, status: PermissionStatus) -> bool {
        let mut state = self.inner.state.write();
        state
            .included_permissions
            .insert(permission.clone(), status);
        state.included_permissions.contains_key(permission)
    }

    /// Drop the local status for a permission. Idempotent.
    ///
    /// # Returns
    ///
    /// `true` if the local map no longer holds an entry for `permission`.
    pub fn remove_permission(&self, permission: &Permission) -> bool {
        let mut state = self.inner.state.write();
        state.included_permissions.remove(permission);
        !state.included_permissions.contains_key(permission)
    }

    /// Snapshot of the included roles that are still alive.
    pub fn included_roles(&self) -> Vec<Role> {
        self.inner
            .state
            .read()
            .included_roles
            .values()
            .filter_map(|weak| weak.upgrade())
            .map(|inner| Role { inner })
            .collect()
    }

    /// Snapshot of every inclusion link, including links to roles that have
    /// since been dropped.
    pub fn included_role_links(&self) -> Vec<WeakRole> {
        self.inner
            .state
            .read()
            .included_roles
            .iter()
            .map(|(key, weak)| WeakRole {
                key: *key,
                inner: weak.clone(),
            })
            .collect()
    }

    /// Snapshot of the local permission map.
    pub fn included_permissions(&self) -> HashMap<Permission, PermissionStatus> {
        self.inner.state.read().included_permissions.clone()
    }

    /// Check if `other` is directly included by this role.
    pub fn includes_role(&self, other: &Role) -> bool {
        self.inner
            .state
            .read()
            .included_roles
            .contains_key(&other.key())
    }

    /// Local status of a permission, if this role sets one.
    pub fn permission_status(&self, permission: &Permission) -> Option<PermissionStatus> {
        self.inner
            .state
            .read()
            .included_permissions
            .get(permission)
            .copied()
    }

    /// A non-owning handle to this role.
    pub fn downgrade(&self) -> WeakRole {
        WeakRole {
            key: self.key(),
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sub-roles are listed by key only; the graph may be cyclic.
        let state = self.inner.state.read();
        let mut included: Vec<&EntityKey> = state.included_roles.keys().collect();
        included.sort();
        f.debug_struct("Role")
            .field("key", &self.inner.key)
            .field("name", &self.inner.name)
            .field("included_roles", &included)
            .field("included_permissions", &state.included_permissions.len())
            .finish()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

impl WeakRole {
    /// Identity of the referenced role, available even after it was dropped.
    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// The referenced role, if its owner still holds it.
    pub fn upgrade(&self) -> Option<Role> {
        self.inner.upgrade().map(|inner| Role { inner })
    }
}

impl fmt::Debug for WeakRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRole")
            .field("key", &self.key)
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_creation() {
        let role = Role::new("viewer");
        assert_eq!(role.name(), "viewer");
        assert!(role.id().is_none());
        assert!(role.included_roles().is_empty());
        assert!(role.included_permissions().is_empty());

        let id = Uuid::now_v7();
        let role = Role::with_id(id, "admin");
        assert_eq!(role.id(), Some(id));
        assert_eq!(role.key(), EntityKey::Persisted(id));
    }

    #[test]
    fn test_role_identity() {
        let id = Uuid::now_v7();
        assert_eq!(Role::with_id(id, "a"), Role::with_id(id, "b"));

        let transient = Role::new("a");
        assert_eq!(transient, transient.clone());
        assert_ne!(transient, Role::new("a"));
    }

    #[test]
    fn test_add_role_reports_presence() {
        let parent = Role::new("parent");
        let child = Role::new("child");

        assert!(parent.add_role(&child));
        assert!(parent.add_role(&child));
        assert_eq!(parent.included_roles(), vec![child.clone()]);
        assert!(!child.includes_role(&parent));
    }

    #[test]
    fn test_remove_role_is_idempotent() {
        let parent = Role::new("parent");
        let child = Role::new("child");
        parent.add_role(&child);

        assert!(parent.remove_role(&child));
        assert!(parent.remove_role(&child));
        assert!(parent.included_roles().is_empty());
        assert!(!parent.includes_role(&child));
    }

    #[test]
    fn test_same_id_handle_keeps_live_link() {
        let id = Uuid::now_v7();
        let parent = Role::new("parent");
        let stored = Role::with_id(id, "child");
        parent.add_role(&stored);

        {
            let reloaded = Role::with_id(id, "child");
            assert!(parent.add_role(&reloaded));
        }

        assert!(parent.includes_role(&stored));
        assert_eq!(parent.included_roles(), vec![stored.clone()]);
        assert!(parent.included_role_links()[0].upgrade().is_some());
    }

    #[test]
    fn test_same_id_handle_replaces_dropped_link() {
        let id = Uuid::now_v7();
        let parent = Role::new("parent");
        {
            let stale = Role::with_id(id, "child");
            parent.add_role(&stale);
        }
        assert!(parent.included_roles().is_empty());

        let reloaded = Role::with_id(id, "child");
        assert!(parent.add_role(&reloaded));
        assert_eq!(parent.included_roles(), vec![reloaded.clone()]);
    }

    #[test]
    fn test_self_inclusion_allowed() {
        let role = Role::new("loop");
        assert!(role.add_role(&role));
        assert!(role.includes_role(&role));
        assert_eq!(role.included_roles(), vec![role.clone()]);
    }

    #[test]
    fn test_add_permission_overwrites() {
        let role = Role::new("editor");
        let write = Permission::new("write");

        assert!(role.add_permission(&write, PermissionStatus::Allow));
        assert!(role.add_permission(&write, PermissionStatus::Deny));
        assert_eq!(role.permission_status(&write), Some(PermissionStatus::Deny));
        assert_eq!(role.included_permissions().len(), 1);
    }

    #[test]
    fn test_remove_permission_is_idempotent() {
        let role = Role::new("editor");
        let write = Permission::new("write");
        role.add_permission(&write, PermissionStatus::Allow);

        assert!(role.remove_permission(&write));
        assert!(role.remove_permission(&write));
        assert_eq!(role.permission_status(&write), None);
    }

    #[test]
    fn test_mutation_visible_through_clones() {
        let role = Role::new("editor");
        let handle = role.clone();
        let write = Permission::new("write");

        handle.add_permission(&write, PermissionStatus::Allow);
        assert_eq!(role.permission_status(&write), Some(PermissionStatus::Allow));
    }

    #[test]
    fn test_snapshots_are_detached() {
        let role = Role::new("editor");
        let write = Permission::new("write");
        role.add_permission(&write, PermissionStatus::Allow);

        let mut snapshot = role.included_permissions();
        snapshot.clear();
        assert_eq!(role.included_permissions().len(), 1);
    }

    #[test]
    fn test_dropped_sub_role_leaves_graph() {
        let parent = Role::new("parent");
        {
            let child = Role::new("child");
            parent.add_role(&child);
            assert_eq!(parent.included_roles().len(), 1);
        }
        assert!(parent.included_roles().is_empty());

        let links = parent.included_role_links();
        assert_eq!(links.len(), 1);
        assert!(links[0].upgrade().is_none());
    }

    #[test]
    fn test_mutual_inclusion_does_not_leak_strong_refs() {
        let a = Role::new("a");
        let b = Role::new("b");
        a.add_role(&b);
        b.add_role(&a);

        let weak = a.downgrade();
        drop(a);
        assert!(weak.upgrade().is_none());
        assert!(b.included_roles().is_empty());
    }

    #[test]
    fn test_debug_handles_cycles() {
        let role = Role::new("loop");
        role.add_role(&role);
        let rendered = format!("{:?}", role);
        assert!(rendered.contains("loop"));
    }
}
