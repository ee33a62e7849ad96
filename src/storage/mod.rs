//! # Storage Layer
//!
//! SQLite-backed persistence for the credential store.

pub mod pool;
pub mod repositories;

pub use pool::{create_pool, DbPool};

use crate::errors::{Error, Result};

/// Run embedded database migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| Error::internal(format!("Failed to run database migrations: {}", e)))?;
    tracing::info!("Database migrations applied");
    Ok(())
}
