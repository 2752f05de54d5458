//! Resolver configuration.
//!
//! Loaded from environment variables with defaults that leave traversal
//! unbounded, so resolution never fails because of graph shape unless a
//! budget is explicitly configured.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the traversal budget.
pub const MAX_STEPS_ENV: &str = "ROLEGRAPH_MAX_STEPS";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Settings for a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum number of roles a single resolve call may enter.
    ///
    /// `None` means unbounded. Roles shared along several paths count once
    /// per path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ROLEGRAPH_MAX_STEPS`: Traversal budget per resolve call (default: unbounded)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_steps: std::env::var(MAX_STEPS_ENV)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .or(default.max_steps),
        }
    }

    /// Set the traversal budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: MAX_STEPS_ENV.to_string(),
                message: "budget must allow at least the starting role".to_string(),
            });
        }
        Ok(())
    }
}
