//! # Rolegraph Model
//!
//! Roles, permissions and the inclusion graph between roles.
//!
//! ## Overview
//!
//! The rolegraph-model crate handles:
//! - **Permissions**: Identified, named capabilities
//! - **Roles**: Graph nodes that include other roles and set local permission statuses
//! - **Permission Status**: `Allow` or `Deny` within one role's local map
//! - **Identity**: Id-based equality for persisted entities, handle identity otherwise
//!
//! ## Architecture
//!
//! ```text
//! Role
//!   ├─ included_roles ──────→ Role (non-owning, may form cycles)
//!   └─ included_permissions ─→ Permission ↦ Allow | Deny
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rolegraph_model::{Permission, PermissionStatus, Role};
//! use uuid::Uuid;
//!
//! let read = Permission::with_id(Uuid::now_v7(), "document:read");
//! let viewer = Role::with_id(Uuid::now_v7(), "viewer");
//! viewer.add_permission(&read, PermissionStatus::Allow);
//!
//! let editor = Role::with_id(Uuid::now_v7(), "editor");
//! editor.add_role(&viewer);
//! ```
//!
//! Computing the effective permissions of a role lives in `rolegraph-engine`.

pub mod identity;
pub mod permission;
pub mod role;
pub mod status;

// Re-export main types for convenience
pub use identity::EntityKey;
pub use permission::{Permission, PermissionSet};
pub use role::{Role, WeakRole};
pub use status::PermissionStatus;
