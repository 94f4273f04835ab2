//! Inventory operations (application-level orchestration).
//!
//! `InventoryService` sits between the HTTP layer and an [`InventoryStore`].
//! Every operation follows the same shape:
//!
//! ```text
//! request
//!   ↓
//! 1. Preconditions (name, quantity), fail fast, no store access
//!   ↓
//! 2. Allow-list gate (writes only, re-checked on every upsert)
//!   ↓
//! 3. Exactly one store call
//! ```
//!
//! Category and subcategory arrive already normalized; the transport layer
//! lower-cases them. Inventory names are used as given.
//!
//! The gate is consulted on updates too: dropping a pair from the allow-list
//! stops further writes to records already stored under it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use stockroom_core::DomainError;
use stockroom_inventory::{AllowList, InventoryRecord, ItemKey, require_name, require_quantity};

use crate::inventory_store::{InventoryStore, InventoryStoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller input or allow-list rejection (deterministic, never retried).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Backing store failure, propagated as-is.
    #[error(transparent)]
    Store(#[from] InventoryStoreError),
}

/// Inventory record service: queries, gated upsert, deletes.
///
/// Cheap to clone when `S` is (e.g. `Arc<...>`); the allow-list is shared
/// read-only.
#[derive(Debug, Clone)]
pub struct InventoryService<S> {
    store: S,
    allow_list: Arc<AllowList>,
}

impl<S> InventoryService<S>
where
    S: InventoryStore,
{
    pub fn new(store: S, allow_list: Arc<AllowList>) -> Self {
        Self { store, allow_list }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Whether the (normalized) pair may be stored.
    pub fn is_allowed(&self, category: &str, subcategory: &str) -> Result<bool, ServiceError> {
        Ok(self.allow_list.is_allowed(category, subcategory)?)
    }

    /// All items of an inventory. Empty when the inventory does not exist.
    #[instrument(skip(self), err)]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<InventoryRecord>, ServiceError> {
        require_name(name)?;
        Ok(self.store.find_by_name(name).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_name_and_category(
        &self,
        name: &str,
        category: &str,
    ) -> Result<Vec<InventoryRecord>, ServiceError> {
        require_name(name)?;
        Ok(self.store.find_by_name_and_category(name, category).await?)
    }

    /// The item for an exact triple; `None` when absent.
    #[instrument(skip(self), err)]
    pub async fn find_one(
        &self,
        name: &str,
        category: &str,
        subcategory: &str,
    ) -> Result<Option<InventoryRecord>, ServiceError> {
        require_name(name)?;
        let key = ItemKey::new(name, category, subcategory);
        Ok(self.store.find_one(&key).await?)
    }

    /// Set the quantity of an item, creating it if absent.
    ///
    /// Checks, in order: non-empty name, non-negative quantity, allow-listed pair.
    /// Returns the record as stored after the write.
    #[instrument(skip(self), err)]
    pub async fn upsert(
        &self,
        name: &str,
        category: &str,
        subcategory: &str,
        quantity: i64,
    ) -> Result<InventoryRecord, ServiceError> {
        require_name(name)?;
        require_quantity(quantity)?;

        if !self.allow_list.is_allowed(category, subcategory)? {
            warn!(category, subcategory, "rejected write for pair outside allow-list");
            let err = DomainError::item_not_allowed("item does not exist, create it first");
            return Err(err.into());
        }

        let key = ItemKey::new(name, category, subcategory);
        let outcome = self.store.upsert_quantity(&key, quantity).await?;

        info!(
            key = %key,
            quantity,
            created = outcome.created,
            "inventory item upserted"
        );
        Ok(outcome.record)
    }

    /// Remove an inventory and all its items. No-op when it does not exist.
    #[instrument(skip(self), err)]
    pub async fn delete_by_name(&self, name: &str) -> Result<(), ServiceError> {
        require_name(name)?;
        let removed = self.store.delete_by_name(name).await?;
        info!(removed, "inventory deleted");
        Ok(())
    }

    /// Remove one item. No-op when it does not exist.
    #[instrument(skip(self), err)]
    pub async fn delete_one(
        &self,
        name: &str,
        category: &str,
        subcategory: &str,
    ) -> Result<(), ServiceError> {
        require_name(name)?;
        let key = ItemKey::new(name, category, subcategory);
        let removed = self.store.delete_one(&key).await?;
        info!(key = %key, removed, "inventory item deleted");
        Ok(())
    }
}
