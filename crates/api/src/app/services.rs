use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use hotelier_infra::InventoryService;
use hotelier_infra::seed::seed_demo_data;
use hotelier_infra::store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore};

use crate::config::ApiConfig;

/// Store chosen at startup.
pub type SharedStore = Arc<dyn InventoryStore>;

/// The service every handler talks to.
pub type AppServices = InventoryService<SharedStore>;

/// In-memory wiring (dev/test).
pub fn in_memory_services() -> AppServices {
    let store: SharedStore = Arc::new(InMemoryInventoryStore::new());
    InventoryService::new(store)
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let services = match (config.use_persistent_stores, config.database_url.as_deref()) {
        (true, Some(database_url)) => build_persistent_services(config, database_url).await?,
        (true, None) => {
            tracing::warn!("USE_PERSISTENT_STORES=true but DATABASE_URL not set, falling back to in-memory");
            in_memory_services()
        }
        (false, _) => in_memory_services(),
    };

    if config.seed_demo_data {
        let seeded = seed_demo_data(&services).await.context("failed to seed demo data")?;
        tracing::info!(hotels = seeded, "demo seed finished");
    }

    Ok(services)
}

async fn build_persistent_services(config: &ApiConfig, database_url: &str) -> anyhow::Result<AppServices> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;

    let store = PostgresInventoryStore::new(pool);
    store.migrate().await.context("failed to apply inventory schema")?;
    tracing::info!(max_connections = config.database_max_connections, "using Postgres inventory store");

    let store: SharedStore = Arc::new(store);
    Ok(InventoryService::new(store))
}
