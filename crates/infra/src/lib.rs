//! Infrastructure layer: backing stores, service wiring, config.

pub mod config;
pub mod inventory_store;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use inventory_store::{
    InMemoryInventoryStore, InventoryStore, InventoryStoreError, PostgresInventoryStore,
};
pub use service::{InventoryService, ServiceError};
