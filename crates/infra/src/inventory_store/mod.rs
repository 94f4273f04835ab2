//! Backing store boundary for inventory records.
//!
//! The service layer talks to storage only through [`InventoryStore`]; the
//! in-memory implementation serves dev/tests and the Postgres one production.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use r#trait::{InventoryStore, InventoryStoreError, UpsertOutcome};
