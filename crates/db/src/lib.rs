//! SQLite pool factory, migration runner, and the `db` core module.

mod migrate;
mod pool;

use std::sync::Arc;

use async_trait::async_trait;
use libris_kernel::{InitCtx, Module};
use sqlx::SqlitePool;

pub use migrate::{applied_migrations, migrate, AppliedMigration};
pub use pool::connect;

/// Core module owning the connection pool lifecycle.
pub struct DatabaseModule {
    pool: SqlitePool,
}

impl DatabaseModule {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        tracing::info!(
            target: "libris-db",
            url = %ctx.settings.database.url,
            connections = self.pool.size(),
            "database reachable"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.pool.close().await;
        tracing::info!(target: "libris-db", "database pool closed");
        Ok(())
    }
}

/// Create the core database module for the registry.
pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(DatabaseModule::new(pool))
}
