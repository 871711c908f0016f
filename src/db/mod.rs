//! Storage bootstrap: Postgres pool, migrations and repository selection.

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::Storage;
use crate::services::moments::{MemoryMomentRepository, MomentRepository, PgMomentRepository};

const MAX_CONNECTIONS: u32 = 5;

/// Connect to Postgres and apply the embedded `moments` migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    info!("moments migrations applied");

    Ok(pool)
}

/// Build the repository selected by `storage`.
///
/// # Errors
///
/// Returns an error if the Postgres pool cannot be initialized.
pub async fn open_repository(storage: &Storage) -> Result<Arc<dyn MomentRepository>, sqlx::Error> {
    match storage {
        Storage::Postgres { database_url } => {
            let pool = init_pool(database_url).await?;
            Ok(Arc::new(PgMomentRepository::new(pool)))
        }
        Storage::Memory => {
            info!("using in-memory moment storage; data is lost on exit");
            Ok(Arc::new(MemoryMomentRepository::new()))
        }
    }
}
