//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Actor failed a visibility policy predicate
    #[error("Permission denied")]
    PermissionDenied,

    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A proposal already exists for this (listing, vendor) pair
    #[error("A proposal from this vendor already exists for this listing")]
    DuplicateProposal,

    /// Illegal status change
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Referenced entity absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create an invalid transition error
    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        DomainError::InvalidTransition(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
