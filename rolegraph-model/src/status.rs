//! # Permission Status
//!
//! The grant state a role assigns to a permission in its local map.

use serde::{Deserialize, Serialize};

/// Grant state of a permission within one role.
///
/// - **Allow**: the role grants the permission, whether or not it was inherited
/// - **Deny**: the role strips the permission from its own inherited view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Grant the permission.
    Allow,

    /// Withhold the permission from this role's aggregated view.
    Deny,
}

impl PermissionStatus {
    /// Get the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Allow => "allow",
            PermissionStatus::Deny => "deny",
        }
    }

    /// Parse status from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(PermissionStatus)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use rolegraph_model::PermissionStatus;
    ///
    /// assert_eq!(PermissionStatus::parse("ALLOW"), Some(PermissionStatus::Allow));
    /// assert_eq!(PermissionStatus::parse("revoke"), Some(PermissionStatus::Deny));
    /// assert_eq!(PermissionStatus::parse("maybe"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "allow" | "grant" | "permit" => Some(PermissionStatus::Allow),
            "deny" | "revoke" | "forbid" => Some(PermissionStatus::Deny),
            _ => None,
        }
    }

    /// Check if this status grants the permission.
    pub fn is_allow(&self) -> bool {
        matches!(self, PermissionStatus::Allow)
    }
}
