//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only **misuse faults** live here: a caller handed the domain something it
/// can never legitimately act on. A business rejection (for example a spend
/// limit that would be exceeded) is not an error; operations report it as
/// `Ok(false)` and leave state unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A child entity was paired with an aggregate that does not own it.
    #[error("ownership mismatch: entity belongs to {expected}, got {actual}")]
    OwnershipMismatch { expected: String, actual: String },

    /// An entity was expected to be a member of an aggregate but is not.
    #[error("entity {entity} is not a member of {aggregate}")]
    NotAMember { entity: String, aggregate: String },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn ownership_mismatch(
        expected: impl core::fmt::Display,
        actual: impl core::fmt::Display,
    ) -> Self {
        Self::OwnershipMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn not_a_member(
        entity: impl core::fmt::Display,
        aggregate: impl core::fmt::Display,
    ) -> Self {
        Self::NotAMember {
            entity: entity.to_string(),
            aggregate: aggregate.to_string(),
        }
    }
}
