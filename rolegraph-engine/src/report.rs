//! Resolution reports.
//!
//! A [`Resolution`] records what a single resolve call produced along with
//! traversal statistics, for audit logs and API responses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use rolegraph_model::{EntityKey, PermissionSet, Role};

/// Counters gathered while walking the role graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    /// Roles entered, counting the starting role and every re-entry along a distinct path.
    pub steps: usize,
    /// Times the cycle guard cut a path short.
    pub cycle_cuts: usize,
    /// Inclusion links skipped because the sub-role had been dropped.
    pub dangling_links: usize,
}

/// The outcome of resolving one role.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Identity of the resolved role.
    pub role_key: EntityKey,
    /// External id of the resolved role, if assigned.
    pub role_id: Option<Uuid>,
    /// Display name of the resolved role.
    pub role_name: String,
    /// The effective permissions.
    #[serde(skip)]
    pub permissions: PermissionSet,
    /// Sorted display names of the effective permissions.
    pub granted: Vec<String>,
    /// Traversal counters.
    pub stats: TraversalStats,
    /// When the resolution was computed.
    pub resolved_at: DateTime<Utc>,
}

impl Resolution {
    pub(crate) fn new(role: &Role, permissions: PermissionSet, stats: TraversalStats) -> Self {
        Self {
            role_key: role.key(),
            role_id: role.id(),
            role_name: role.name().to_string(),
            granted: permissions.names(),
            permissions,
            stats,
            resolved_at: Utc::now(),
        }
    }

    /// Check if nothing was granted.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}
