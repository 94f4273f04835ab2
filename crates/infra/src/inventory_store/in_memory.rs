use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockroom_core::RecordId;
use stockroom_inventory::{InventoryRecord, ItemKey};

use super::r#trait::{InventoryStore, InventoryStoreError, UpsertOutcome};

type Records = HashMap<ItemKey, InventoryRecord>;

/// In-memory inventory store.
///
/// Intended for tests/dev. The map key is the composite triple, so uniqueness
/// holds by construction; every operation takes the lock exactly once.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    records: RwLock<Records>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all inventories.
    pub fn len(&self) -> Result<usize, InventoryStoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, InventoryStoreError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, InventoryStoreError> {
        self.records
            .read()
            .map_err(|_| InventoryStoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, InventoryStoreError> {
        self.records
            .write()
            .map_err(|_| InventoryStoreError::Unavailable("lock poisoned".to_string()))
    }

    fn select<F>(&self, pred: F) -> Result<Vec<InventoryRecord>, InventoryStoreError>
    where
        F: Fn(&ItemKey) -> bool,
    {
        let records = self.read()?;

        let mut out: Vec<InventoryRecord> = records
            .iter()
            .filter(|(k, _)| pred(k))
            .map(|(_, r)| r.clone())
            .collect();
        out.sort_by(|a, b| {
            (a.category(), a.subcategory()).cmp(&(b.category(), b.subcategory()))
        });
        Ok(out)
    }
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Vec<InventoryRecord>, InventoryStoreError> {
        self.select(|k| k.name == name)
    }

    async fn find_by_name_and_category(
        &self,
        name: &str,
        category: &str,
    ) -> Result<Vec<InventoryRecord>, InventoryStoreError> {
        self.select(|k| k.name == name && k.category == category)
    }

    async fn find_one(
        &self,
        key: &ItemKey,
    ) -> Result<Option<InventoryRecord>, InventoryStoreError> {
        let records = self.read()?;
        Ok(records.get(key).cloned())
    }

    async fn upsert_quantity(
        &self,
        key: &ItemKey,
        quantity: i64,
    ) -> Result<UpsertOutcome, InventoryStoreError> {
        if quantity < 0 {
            return Err(InventoryStoreError::Conflict(
                "quantity violates non-negative check".to_string(),
            ));
        }

        let mut records = self.write()?;

        match records.get_mut(key) {
            Some(existing) => {
                existing.set_quantity(quantity);
                Ok(UpsertOutcome {
                    record: existing.clone(),
                    created: false,
                })
            }
            None => {
                let record = InventoryRecord::new(RecordId::new(), key.clone(), quantity);
                records.insert(key.clone(), record.clone());
                Ok(UpsertOutcome {
                    record,
                    created: true,
                })
            }
        }
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, InventoryStoreError> {
        let mut records = self.write()?;

        let before = records.len();
        records.retain(|k, _| k.name != name);
        Ok((before - records.len()) as u64)
    }

    async fn delete_one(&self, key: &ItemKey) -> Result<u64, InventoryStoreError> {
        let mut records = self.write()?;

        Ok(records.remove(key).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Entity;

    fn key(name: &str, category: &str, subcategory: &str) -> ItemKey {
        ItemKey::new(name, category, subcategory)
    }

    #[tokio::test]
    async fn upsert_creates_then_updates_in_place() {
        let store = InMemoryInventoryStore::new();
        let k = key("inv1", "cat1", "subcat1");

        let first = store.upsert_quantity(&k, 8).await.unwrap();
        assert!(first.created);
        assert_eq!(first.record.quantity(), 8);

        let second = store.upsert_quantity(&k, 3).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.record.quantity(), 3);
        assert_eq!(second.record.id(), first.record.id());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn queries_filter_on_exact_fields() {
        let store = InMemoryInventoryStore::new();
        store.upsert_quantity(&key("inv1", "cat1", "subcat1"), 1).await.unwrap();
        store.upsert_quantity(&key("inv1", "cat2", "subcat3"), 2).await.unwrap();
        store.upsert_quantity(&key("inv1_other", "cat2", "subcat4"), 3).await.unwrap();

        assert_eq!(store.find_by_name("inv1").await.unwrap().len(), 2);
        assert_eq!(store.find_by_name("INV1").await.unwrap().len(), 0);

        let cat2 = store.find_by_name_and_category("inv1", "cat2").await.unwrap();
        assert_eq!(cat2.len(), 1);
        assert_eq!(cat2[0].subcategory(), "subcat3");

        assert!(store.find_one(&key("inv1", "cat2", "subcat4")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_is_ordered_by_category_then_subcategory() {
        let store = InMemoryInventoryStore::new();
        store.upsert_quantity(&key("inv1", "cat2", "b"), 1).await.unwrap();
        store.upsert_quantity(&key("inv1", "cat1", "z"), 1).await.unwrap();
        store.upsert_quantity(&key("inv1", "cat2", "a"), 1).await.unwrap();

        let keys: Vec<String> = store
            .find_by_name("inv1")
            .await
            .unwrap()
            .iter()
            .map(|r| r.key().to_string())
            .collect();
        assert_eq!(keys, vec!["inv1/cat1/z", "inv1/cat2/a", "inv1/cat2/b"]);
    }

    #[tokio::test]
    async fn deletes_report_removed_counts() {
        let store = InMemoryInventoryStore::new();
        store.upsert_quantity(&key("inv1", "cat1", "subcat1"), 1).await.unwrap();
        store.upsert_quantity(&key("inv1", "cat1", "subcat2"), 1).await.unwrap();
        store.upsert_quantity(&key("inv2", "cat1", "subcat1"), 1).await.unwrap();

        assert_eq!(store.delete_one(&key("inv1", "cat1", "subcat1")).await.unwrap(), 1);
        assert_eq!(store.delete_one(&key("inv1", "cat1", "subcat1")).await.unwrap(), 0);
        assert_eq!(store.delete_by_name("inv1").await.unwrap(), 1);
        assert_eq!(store.delete_by_name("inv1").await.unwrap(), 0);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected_by_the_store_check() {
        let store = InMemoryInventoryStore::new();
        let err = store.upsert_quantity(&key("inv1", "cat1", "subcat1"), -1).await.unwrap_err();
        assert!(matches!(err, InventoryStoreError::Conflict(_)));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn poisoned_lock_reports_unavailable() {
        let store = std::sync::Arc::new(InMemoryInventoryStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(InventoryStoreError::Unavailable(_))));
        assert!(matches!(store.is_empty(), Err(InventoryStoreError::Unavailable(_))));
    }
}
