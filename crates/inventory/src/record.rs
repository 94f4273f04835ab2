use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, RecordId};

/// Composite identity of an item: (inventory name, category, subcategory).
///
/// At most one record exists per key. `category` and `subcategory` are expected
/// to be normalized already; `name` is kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub name: String,
    pub category: String,
    pub subcategory: String,
}

impl ItemKey {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }
}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}/{}", self.name, self.category, self.subcategory)
    }
}

/// A stored quantity for one item of one inventory.
///
/// Only `quantity` changes after creation; the key fields are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    id: RecordId,
    name: String,
    category: String,
    subcategory: String,
    quantity: i64,
}

impl InventoryRecord {
    /// Build a record as read back from (or created by) a backing store.
    pub fn new(id: RecordId, key: ItemKey, quantity: i64) -> Self {
        Self {
            id,
            name: key.name,
            category: key.category,
            subcategory: key.subcategory,
            quantity,
        }
    }

    pub fn id_typed(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.name, &self.category, &self.subcategory)
    }

    /// Replace the quantity wholesale (no accumulation).
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }
}

impl Entity for InventoryRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
