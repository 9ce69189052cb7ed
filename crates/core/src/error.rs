//! Domain error model.

use thiserror::Error;

/// Domain-level error for primitive parsing.
///
/// Business rule failures (pairings, capacity, uniqueness) live in
/// `hotelier-rooms::ValidationError`; this type only covers values that could
/// not be turned into domain primitives at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// An enumerated value was not one of the known variants.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }
}
