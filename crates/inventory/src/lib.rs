//! Inventory domain module.
//!
//! This crate contains the business rules for inventory records, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod allow_list;
pub mod normalize;
pub mod record;

pub use allow_list::AllowList;
pub use normalize::{normalize_segment, require_name, require_quantity};
pub use record::{InventoryRecord, ItemKey};
