//! Libris application library
//!
//! Catalog, member and lending modules plus the bootstrap that wires them
//! into the libris framework crates.

pub mod bootstrap;
pub mod error;
pub mod modules;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing {
    use libris_kernel::{settings::DatabaseSettings, ModuleRegistry};
    use sqlx::SqlitePool;

    /// Fresh in-memory database with every module's tables.
    pub async fn db() -> SqlitePool {
        let pool = libris_db::connect(&DatabaseSettings::in_memory())
            .await
            .expect("open in-memory database");
        let mut registry = ModuleRegistry::new();
        crate::modules::register_all(&mut registry, &pool, &Default::default());
        libris_db::migrate(&pool, &registry.collect_migrations())
            .await
            .expect("apply migrations");
        pool
    }
}
