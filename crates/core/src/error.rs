//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, caller-facing failures. Backing-store
/// failures are infrastructure concerns and live next to the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed caller input (empty required string, negative quantity).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A write targeted a (category, subcategory) pair missing from the allow-list.
    #[error("item not allowed: {0}")]
    ItemNotAllowed(String),

    /// A read produced no matching record(s).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn item_not_allowed(msg: impl Into<String>) -> Self {
        Self::ItemNotAllowed(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_detail() {
        let err = DomainError::invalid_argument("name must be a valid string");
        assert_eq!(err.to_string(), "invalid argument: name must be a valid string");

        let err = DomainError::item_not_allowed("item does not exist, create it first");
        assert_eq!(err.to_string(), "item not allowed: item does not exist, create it first");
    }

    #[test]
    fn not_found_has_a_fixed_message() {
        assert_eq!(DomainError::not_found(), DomainError::NotFound);
        assert_eq!(DomainError::not_found().to_string(), "not found");
    }
}
