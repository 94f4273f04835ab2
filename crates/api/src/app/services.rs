use std::sync::Arc;

use anyhow::Context;

use stockroom_infra::{
    AppConfig, InMemoryInventoryStore, InventoryService, InventoryStore, PostgresInventoryStore,
};
use stockroom_inventory::AllowList;

/// Type-erased store so handlers don't care which backend is wired.
pub type SharedStore = Arc<dyn InventoryStore>;

/// Services shared by all handlers.
#[derive(Clone)]
pub struct AppServices {
    inventory: InventoryService<SharedStore>,
    backend: &'static str,
}

impl AppServices {
    pub fn new(store: SharedStore, allow_list: Arc<AllowList>, backend: &'static str) -> Self {
        Self {
            inventory: InventoryService::new(store, allow_list),
            backend,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory(allow_list: AllowList) -> Self {
        Self::new(
            Arc::new(InMemoryInventoryStore::new()),
            Arc::new(allow_list),
            "in_memory",
        )
    }

    pub fn inventory(&self) -> &InventoryService<SharedStore> {
        &self.inventory
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

/// Build services from configuration: Postgres when `database_url` is set,
/// in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let allow_list = config.allow_list();
    if allow_list.is_empty() {
        tracing::warn!("allow-list is empty; every upsert will be rejected");
    } else {
        tracing::info!(pairs = allow_list.len(), "allow-list loaded");
    }

    match config.database_url.as_deref() {
        Some(url) => {
            let store = PostgresInventoryStore::connect(
                url,
                config.max_connections,
                config.acquire_timeout(),
            )
            .await
            .context("failed to connect to Postgres")?;
            store
                .ensure_schema()
                .await
                .context("failed to prepare inventory schema")?;

            tracing::info!("using Postgres inventory store");
            Ok(AppServices::new(Arc::new(store), Arc::new(allow_list), "postgres"))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory inventory store");
            Ok(AppServices::in_memory(allow_list))
        }
    }
}
