pub mod csv_file;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod transfer;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{Config, StoreBackend};

pub use csv_file::CsvRecordStore;
pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;
pub use store::{RecordStore, StoreError};
pub use transfer::{export_to_csv, import_from_csv};

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded in ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Open the store selected by `config.store_backend`, migrating Postgres if needed.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres store"))?;
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            Arc::new(PgRecordStore::new(pool))
        }
        StoreBackend::Csv => Arc::new(CsvRecordStore::new(&config.csv_path)),
        StoreBackend::Memory => Arc::new(MemoryRecordStore::new()),
    };
    tracing::info!("Using {} record store", store.backend_name());
    Ok(store)
}
