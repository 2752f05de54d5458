//! # Rolegraph Engine
//!
//! Effective-permission resolution over `rolegraph-model` role graphs.
//!
//! ## Overview
//!
//! The rolegraph-engine crate handles:
//! - **Resolution**: Union of included roles' grants with local allow/deny applied on top
//! - **Cycle Guard**: Per-call tracking of roles on the current path
//! - **Budgets**: Optional cap on roles entered per call
//! - **Reports**: Serializable resolution results with traversal counters
//!
//! ## Resolution Rule
//!
//! ```text
//! resolve(R) = apply(R.included_permissions, ⋃ resolve(S) for S in R.included_roles)
//!
//! apply: Allow → insert, Deny → remove
//! re-entering a role already on the current path contributes ∅
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rolegraph_engine::Resolver;
//! use rolegraph_model::{Permission, PermissionStatus, Role};
//!
//! let p1 = Permission::new("p1");
//! let a = Role::new("a");
//! let b = Role::new("b");
//! a.add_role(&b);
//! b.add_role(&a);
//! b.add_permission(&p1, PermissionStatus::Allow);
//!
//! let granted = Resolver::default().resolve(&a).unwrap();
//! assert!(granted.contains(&p1));
//! ```
//!
//! ## Configuration
//!
//! - `ROLEGRAPH_MAX_STEPS`: Optional traversal budget per call (unset means unbounded)

pub mod config;
pub mod error;
pub mod report;
pub mod resolver;

// Re-export main types for convenience
pub use config::{ConfigError, ResolverConfig};
pub use error::{AccessError, AccessResult};
pub use report::{Resolution, TraversalStats};
pub use resolver::Resolver;
