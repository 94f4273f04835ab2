//! Input normalization and caller-input preconditions.

use stockroom_core::{DomainError, DomainResult};

/// Lower-case a category or subcategory segment.
///
/// Applied at the transport boundary before values are used as lookup or
/// storage keys. Inventory names are never passed through this.
pub fn normalize_segment(segment: &str) -> String {
    segment.to_lowercase()
}

/// An inventory name must contain at least one non-whitespace character.
pub fn require_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::invalid_argument("name must be a valid string"));
    }
    Ok(())
}

/// Quantities are replaced wholesale and may be zero, never negative.
pub fn require_quantity(quantity: i64) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::invalid_argument("quantity must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lower_cases_segments() {
        assert_eq!(normalize_segment(""), "");
        assert_eq!(normalize_segment("test"), "test");
        assert_eq!(normalize_segment("TEST"), "test");
        assert_eq!(normalize_segment("Test1"), "test1");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            require_name("").unwrap_err(),
            DomainError::invalid_argument("name must be a valid string")
        );
        assert!(require_name("inv1").is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        for name in [" ", "   ", "\t", " \n "] {
            assert!(require_name(name).is_err(), "{name:?} should be rejected");
        }
        assert!(require_name(" inv1 ").is_ok());
    }

    #[test]
    fn negative_quantity_is_rejected() {
        assert_eq!(
            require_quantity(-1).unwrap_err(),
            DomainError::invalid_argument("quantity must be positive")
        );
        assert!(require_quantity(0).is_ok());
        assert!(require_quantity(8).is_ok());
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in "[\\p{Latin}0-9 _-]{0,32}") {
            let once = normalize_segment(&s);
            prop_assert_eq!(normalize_segment(&once), once);
        }

        #[test]
        fn ascii_segments_lose_all_upper_case(s in "[A-Za-z0-9_-]{0,24}") {
            let n = normalize_segment(&s);
            prop_assert!(!n.chars().any(|c| c.is_ascii_uppercase()));
            prop_assert!(n.eq_ignore_ascii_case(&s));
        }
    }
}
