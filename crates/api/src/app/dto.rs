use serde::Serialize;

use stockroom_inventory::InventoryRecord;

// -------------------------
// Response DTOs
// -------------------------

/// Public view of a record; the store-assigned identity stays internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecordResponse {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub quantity: i64,
}

impl From<&InventoryRecord> for InventoryRecordResponse {
    fn from(r: &InventoryRecord) -> Self {
        Self {
            name: r.name().to_string(),
            category: r.category().to_string(),
            subcategory: r.subcategory().to_string(),
            quantity: r.quantity(),
        }
    }
}

pub fn records_to_json(records: &[InventoryRecord]) -> Vec<InventoryRecordResponse> {
    records.iter().map(InventoryRecordResponse::from).collect()
}
