use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use trolley_core::config::{AppConfig, ConfigError, LoadOptions};
use trolley_core::{CartError, CartManager, ProviderError};
use trolley_services::StorefrontClient;
use trolley_store::{connect_with_settings, migrations, DbPool, SqliteCartStore};

/// Wired application: config, snapshot store pool, service client, and the
/// restored cart manager.
pub struct Runtime {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub client: StorefrontClient,
    pub manager: CartManager,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("snapshot store connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("snapshot store migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("service client construction failed: {0}")]
    Client(#[source] ProviderError),
    #[error("cart restore failed: {0}")]
    Restore(#[source] CartError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Runtime, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Runtime, BootstrapError> {
    let db_pool = connect_with_settings(
        &config.store.database_url,
        config.store.max_connections,
        config.store.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;

    let client = StorefrontClient::new(&config.services).map_err(BootstrapError::Client)?;
    let store = Arc::new(SqliteCartStore::new(db_pool.clone()));

    let manager = CartManager::restore(
        Arc::new(client.clone()),
        Arc::new(client.clone()),
        store,
    )
    .await
    .map_err(BootstrapError::Restore)?;

    info!(
        event_name = "system.bootstrap.completed",
        base_url = %config.services.base_url,
        "storefront runtime wired"
    );

    Ok(Runtime { config, db_pool, client, manager })
}
