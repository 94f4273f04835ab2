use std::sync::Arc;

use thiserror::Error;

use stockroom_inventory::{InventoryRecord, ItemKey};

/// Result of an atomic create-or-update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Post-update state of the record.
    pub record: InventoryRecord,
    /// `true` when the record did not exist before the call.
    pub created: bool,
}

/// Backing store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors
/// (`InvalidArgument`, `ItemNotAllowed`). The core never retries them.
#[derive(Debug, Error)]
pub enum InventoryStoreError {
    /// A uniqueness or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store could not be reached (pool closed, timeout, io).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other storage failure, including undecodable rows.
    #[error("database error: {0}")]
    Database(String),
}

/// Record store keyed by the composite (name, category, subcategory) identity.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - enforce uniqueness of the triple in the store itself (constraint or keyed map)
/// - implement `upsert_quantity` as a single atomic create-or-update, so two callers
///   racing on an unseen triple can never both create it
/// - treat deletes of missing records as successful no-ops
/// - perform exactly one store round-trip per call
///
/// Inputs are taken as given: validation and normalization happen above this layer.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// All records of one inventory.
    async fn find_by_name(&self, name: &str) -> Result<Vec<InventoryRecord>, InventoryStoreError>;

    /// Records of one inventory within one category.
    async fn find_by_name_and_category(
        &self,
        name: &str,
        category: &str,
    ) -> Result<Vec<InventoryRecord>, InventoryStoreError>;

    /// The record for an exact triple, if present.
    async fn find_one(&self, key: &ItemKey) -> Result<Option<InventoryRecord>, InventoryStoreError>;

    /// Create the record with `quantity`, or overwrite the quantity of the existing one.
    async fn upsert_quantity(
        &self,
        key: &ItemKey,
        quantity: i64,
    ) -> Result<UpsertOutcome, InventoryStoreError>;

    /// Remove every record of an inventory. Returns the number removed.
    async fn delete_by_name(&self, name: &str) -> Result<u64, InventoryStoreError>;

    /// Remove the record for an exact triple. Returns the number removed (0 or 1).
    async fn delete_one(&self, key: &ItemKey) -> Result<u64, InventoryStoreError>;
}

#[async_trait::async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn find_by_name(&self, name: &str) -> Result<Vec<InventoryRecord>, InventoryStoreError> {
        (**self).find_by_name(name).await
    }

    async fn find_by_name_and_category(
        &self,
        name: &str,
        category: &str,
    ) -> Result<Vec<InventoryRecord>, InventoryStoreError> {
        (**self).find_by_name_and_category(name, category).await
    }

    async fn find_one(
        &self,
        key: &ItemKey,
    ) -> Result<Option<InventoryRecord>, InventoryStoreError> {
        (**self).find_one(key).await
    }

    async fn upsert_quantity(
        &self,
        key: &ItemKey,
        quantity: i64,
    ) -> Result<UpsertOutcome, InventoryStoreError> {
        (**self).upsert_quantity(key, quantity).await
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, InventoryStoreError> {
        (**self).delete_by_name(name).await
    }

    async fn delete_one(&self, key: &ItemKey) -> Result<u64, InventoryStoreError> {
        (**self).delete_one(key).await
    }
}
