//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Covers the in-memory failures of the inventory (validation, key conflicts,
/// missing records). Persistence failures are reported by the storage layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field failed its constraint. `field` names the first violated field.
    #[error("validation failed: {field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    /// An item with this id is already stored.
    #[error("item with id {0} already exists")]
    DuplicateKey(ItemId),

    /// No item with this id is stored.
    #[error("no item with id {0} found")]
    NotFound(ItemId),

    /// An identifier could not be parsed from text.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(field: &'static str, reason: &'static str) -> Self {
        Self::Validation { field, reason }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Name of the violated field, if this is a validation error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
