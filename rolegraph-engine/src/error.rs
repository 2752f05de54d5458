//! Error types for permission resolution
//!
//! Cyclic graphs, self-inclusion and conflicting statuses across roles are
//! all valid input. Errors here mean the caller passed something it should
//! not have, or a configured traversal budget ran out.

use thiserror::Error;

/// Resolution error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// A required role or permission was missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The traversal entered more roles than the configured budget allows
    #[error("Step budget exceeded: more than {limit} roles entered")]
    StepBudgetExceeded {
        /// Configured maximum number of roles entered per call.
        limit: usize,
    },
}

/// Result type for resolution operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error points at a bug in the calling code.
    ///
    /// Callers should fail the request rather than fall back to granting
    /// or denying access.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, AccessError::InvalidArgument(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AccessError::StepBudgetExceeded { .. } => "STEP_BUDGET_EXCEEDED",
        }
    }
}
