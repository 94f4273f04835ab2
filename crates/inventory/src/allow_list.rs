//! Catalog of (category, subcategory) pairs that items may be stored under.

use std::collections::{BTreeMap, BTreeSet};

use stockroom_core::{DomainError, DomainResult};

/// Immutable allow-list gate.
///
/// Built once at startup and shared read-only (typically as `Arc<AllowList>`).
/// Lookups use exact string equality; callers normalize first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl AllowList {
    pub fn new(categories: BTreeMap<String, BTreeSet<String>>) -> Self {
        Self { categories }
    }

    /// Returns whether `(category, subcategory)` may exist.
    ///
    /// Blank arguments are a precondition failure, not a `false` answer.
    pub fn is_allowed(&self, category: &str, subcategory: &str) -> DomainResult<bool> {
        if category.trim().is_empty() || subcategory.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "item must have a valid category and subcategory",
            ));
        }

        Ok(self
            .categories
            .get(category)
            .is_some_and(|subs| subs.contains(subcategory)))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Number of allowed (category, subcategory) pairs.
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C, S> FromIterator<(C, S)> for AllowList
where
    C: Into<String>,
    S: IntoIterator,
    S::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, S)>>(iter: I) -> Self {
        let mut categories: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (category, subs) in iter {
            categories
                .entry(category.into())
                .or_default()
                .extend(subs.into_iter().map(Into::into));
        }
        Self { categories }
    }
}
