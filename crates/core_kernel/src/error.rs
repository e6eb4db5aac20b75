//! Domain error taxonomy shared by all services
//!
//! Services detect domain rule violations locally and return them as typed
//! values; the request boundary decides how each kind is presented.

use thiserror::Error;

use crate::ports::PortError;

/// Error returned by domain services
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced entity (customer, plan, ...) does not exist or is soft-deleted
    #[error("{0} not found")]
    NotFound(String),

    /// The request conflicts with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage or transport failure; the message carries context, not storage detail
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal(message.into())
    }

    /// Wraps a port failure as an internal error, prefixed with what was being attempted
    pub fn storage(context: &str, error: PortError) -> Self {
        DomainError::Internal(format!("{}: {}", context, error))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(_))
    }
}
