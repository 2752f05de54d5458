//! # Resolver
//!
//! Computes the effective permission set of a role.
//!
//! A role's effective set is the union of the effective sets of the roles it
//! includes, with the role's own statuses applied on top: `Allow` adds the
//! permission, `Deny` removes it. A deny therefore only shapes the view of
//! the role that declares it; roles that reach the same permission through
//! another path keep it.
//!
//! The walk uses an explicit stack, so deep graphs cannot overflow the call
//! stack. Roles on the current path are tracked per call; re-entering one of
//! them contributes nothing for that occurrence. A role reachable along
//! several independent paths (a diamond) is resolved once per path.

use std::collections::HashSet;
use std::vec;
use tracing::{debug, trace, warn};

use rolegraph_model::{EntityKey, Permission, PermissionSet, PermissionStatus, Role, WeakRole};

use crate::config::{ConfigError, ResolverConfig};
use crate::error::{AccessError, AccessResult};
use crate::report::{Resolution, TraversalStats};

/// Resolves effective permissions over a role graph.
///
/// The resolver holds no graph state and never mutates roles, so one
/// instance can serve any number of threads. Callers must not mutate roles
/// reachable from a role while it is being resolved.
///
/// # Example
///
/// ```
/// use rolegraph_engine::Resolver;
/// use rolegraph_model::{Permission, PermissionStatus, Role};
///
/// let publish = Permission::new("post:publish");
///
/// let author = Role::new("author");
/// author.add_permission(&publish, PermissionStatus::Allow);
///
/// let intern = Role::new("intern");
/// intern.add_role(&author);
/// intern.add_permission(&publish, PermissionStatus::Deny);
///
/// let resolver = Resolver::default();
/// assert!(resolver.resolve(&author).unwrap().contains(&publish));
/// assert!(resolver.resolve(&intern).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

/// A role being resolved, with the sub-roles still to visit.
struct Frame {
    role: Role,
    links: vec::IntoIter<WeakRole>,
    inherited: PermissionSet,
}

impl Frame {
    fn new(role: Role) -> Self {
        let links = role.included_role_links().into_iter();
        Self {
            role,
            links,
            inherited: PermissionSet::new(),
        }
    }

    /// Apply the role's local statuses to everything it inherited.
    fn finish(self) -> PermissionSet {
        let mut granted = self.inherited;
        for (permission, status) in self.role.included_permissions() {
            match status {
                PermissionStatus::Allow => {
                    granted.insert(permission);
                }
                PermissionStatus::Deny => {
                    granted.remove(&permission);
                }
            }
        }
        granted
    }
}

impl Resolver {
    /// Create a resolver with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configuration is invalid.
    pub fn new(config: ResolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a resolver configured from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ResolverConfig::from_env())
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Compute the effective permissions of `role`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StepBudgetExceeded` if a step budget is
    /// configured and the walk exceeds it. No partial result is returned.
    pub fn resolve(&self, role: &Role) -> AccessResult<PermissionSet> {
        self.walk(role).map(|(granted, _)| granted)
    }

    /// Compute the effective permissions of a role that may not exist.
    ///
    /// Intended for callers holding the result of a lookup. A missing role
    /// is a caller bug, not an empty grant.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidArgument` if `role` is `None`, otherwise
    /// behaves like [`resolve`](Self::resolve).
    pub fn try_resolve(&self, role: Option<&Role>) -> AccessResult<PermissionSet> {
        let role = role.ok_or_else(|| {
            AccessError::InvalidArgument(
                "cannot resolve permissions for a missing role".to_string(),
            )
        })?;
        self.resolve(role)
    }

    /// Compute the effective permissions of `role` with traversal statistics.
    pub fn resolve_report(&self, role: &Role) -> AccessResult<Resolution> {
        let (granted, stats) = self.walk(role)?;
        Ok(Resolution::new(role, granted, stats))
    }

    /// Check whether `role` is effectively granted `permission`.
    pub fn is_granted(&self, role: &Role, permission: &Permission) -> AccessResult<bool> {
        Ok(self.resolve(role)?.contains(permission))
    }

    fn walk(&self, root: &Role) -> AccessResult<(PermissionSet, TraversalStats)> {
        let mut stats = TraversalStats::default();
        let mut visiting: HashSet<EntityKey> = HashSet::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut resolved = PermissionSet::new();

        self.enter(root.clone(), &mut visiting, &mut stack, &mut stats)?;

        while let Some(frame) = stack.last_mut() {
            match frame.links.next() {
                Some(link) => {
                    if visiting.contains(&link.key()) {
                        stats.cycle_cuts += 1;
                        trace!(
                            role = %frame.role,
                            sub_role = %link.key(),
                            "Cycle guard skipped re-entered role"
                        );
                        continue;
                    }
                    match link.upgrade() {
                        Some(sub_role) => {
                            self.enter(sub_role, &mut visiting, &mut stack, &mut stats)?;
                        }
                        None => {
                            stats.dangling_links += 1;
                            trace!(
                                role = %frame.role,
                                sub_role = %link.key(),
                                "Skipping dropped sub-role"
                            );
                        }
                    }
                }
                None => {
                    if let Some(done) = stack.pop() {
                        let key = done.role.key();
                        let granted = done.finish();
                        visiting.remove(&key);
                        match stack.last_mut() {
                            Some(parent) => parent.inherited.merge(granted),
                            None => resolved = granted,
                        }
                    }
                }
            }
        }

        debug!(
            role = %root,
            role_key = %root.key(),
            granted = resolved.len(),
            steps = stats.steps,
            cycle_cuts = stats.cycle_cuts,
            "Resolved effective permissions"
        );

        Ok((resolved, stats))
    }

    fn enter(
        &self,
        role: Role,
        visiting: &mut HashSet<EntityKey>,
        stack: &mut Vec<Frame>,
        stats: &mut TraversalStats,
    ) -> AccessResult<()> {
        stats.steps += 1;
        if let Some(limit) = self.config.max_steps {
            if stats.steps > limit {
                warn!(
                    role = %role,
                    limit,
                    depth = stack.len(),
                    "Step budget exceeded while resolving permissions"
                );
                return Err(AccessError::StepBudgetExceeded { limit });
            }
        }
        visiting.insert(role.key());
        stack.push(Frame::new(role));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(role: &Role, permission: &Permission) {
        role.add_permission(permission, PermissionStatus::Allow);
    }

    fn deny(role: &Role, permission: &Permission) {
        role.add_permission(permission, PermissionStatus::Deny);
    }

    #[test]
    fn test_empty_role_resolves_empty() {
        let role = Role::new("empty");
        assert!(Resolver::default().resolve(&role).unwrap().is_empty());
    }

    #[test]
    fn test_leaf_role_grants_only_allowed() {
        let read = Permission::new("read");
        let write = Permission::new("write");
        let role = Role::new("leaf");
        allow(&role, &read);
        deny(&role, &write);

        let granted = Resolver::default().resolve(&role).unwrap();
        assert_eq!(granted, vec![read].into_iter().collect::<PermissionSet>());
    }

    #[test]
    fn test_self_inclusion_is_ignored() {
        let read = Permission::new("read");
        let role = Role::new("loop");
        allow(&role, &read);

        let resolver = Resolver::default();
        let before = resolver.resolve(&role).unwrap();
        role.add_role(&role);
        let report = resolver.resolve_report(&role).unwrap();

        assert_eq!(report.permissions, before);
        assert_eq!(report.stats.steps, 1);
        assert_eq!(report.stats.cycle_cuts, 1);
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let p1 = Permission::new("p1");
        let a = Role::new("a");
        let b = Role::new("b");
        a.add_role(&b);
        b.add_role(&a);
        allow(&b, &p1);

        let granted = Resolver::default().resolve(&a).unwrap();
        assert_eq!(granted, vec![p1].into_iter().collect::<PermissionSet>());
    }

    #[test]
    fn test_long_cycle_terminates() {
        let p = Permission::new("p");
        let roles: Vec<Role> = (0..5).map(|i| Role::new(format!("r{}", i))).collect();
        for i in 0..roles.len() {
            roles[i].add_role(&roles[(i + 1) % roles.len()]);
        }
        allow(&roles[3], &p);

        let report = Resolver::default().resolve_report(&roles[0]).unwrap();
        assert!(report.permissions.contains(&p));
        assert_eq!(report.stats.steps, 5);
        assert_eq!(report.stats.cycle_cuts, 1);
    }

    #[test]
    fn test_local_deny_overrides_inherited_allow() {
        let p2 = Permission::new("p2");
        let v = Role::new("v");
        let w = Role::new("w");
        allow(&v, &p2);
        w.add_role(&v);
        deny(&w, &p2);

        let resolver = Resolver::default();
        assert!(resolver.resolve(&w).unwrap().is_empty());
        assert_eq!(
            resolver.resolve(&v).unwrap(),
            vec![p2].into_iter().collect::<PermissionSet>()
        );
    }

    #[test]
    fn test_local_allow_without_inheritance() {
        let p = Permission::new("p");
        let parent = Role::new("parent");
        let child = Role::new("child");
        parent.add_role(&child);
        allow(&parent, &p);

        assert!(Resolver::default().is_granted(&parent, &p).unwrap());
        assert!(!Resolver::default().is_granted(&child, &p).unwrap());
    }

    #[test]
    fn test_diamond_resolves_each_path() {
        let p = Permission::new("p");
        let top = Role::new("top");
        let left = Role::new("left");
        let right = Role::new("right");
        let shared = Role::new("shared");
        top.add_role(&left);
        top.add_role(&right);
        left.add_role(&shared);
        right.add_role(&shared);
        allow(&shared, &p);
        deny(&left, &p);

        let report = Resolver::default().resolve_report(&top).unwrap();
        assert!(report.permissions.contains(&p));
        assert_eq!(report.stats.steps, 5);
        assert_eq!(report.stats.cycle_cuts, 0);
    }

    #[test]
    fn test_try_resolve_missing_role() {
        let err = Resolver::default().try_resolve(None).unwrap_err();
        assert!(matches!(err, AccessError::InvalidArgument(_)));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_try_resolve_present_role() {
        let p = Permission::new("p");
        let role = Role::new("role");
        allow(&role, &p);
        let granted = Resolver::default().try_resolve(Some(&role)).unwrap();
        assert!(granted.contains(&p));
    }

    #[test]
    fn test_step_budget() {
        let a = Role::new("a");
        let b = Role::new("b");
        let c = Role::new("c");
        a.add_role(&b);
        b.add_role(&c);

        let tight = Resolver::new(ResolverConfig::default().with_max_steps(2)).unwrap();
        assert_eq!(
            tight.resolve(&a).unwrap_err(),
            AccessError::StepBudgetExceeded { limit: 2 }
        );

        let exact = Resolver::new(ResolverConfig::default().with_max_steps(3)).unwrap();
        assert!(exact.resolve(&a).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Resolver::new(ResolverConfig::default().with_max_steps(0)).is_err());
    }

    #[test]
    fn test_dangling_link_counted() {
        let parent = Role::new("parent");
        {
            let child = Role::new("child");
            allow(&child, &Permission::new("p"));
            parent.add_role(&child);
        }
        let report = Resolver::default().resolve_report(&parent).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.stats.dangling_links, 1);
    }
}
