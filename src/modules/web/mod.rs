//! Server-rendered pages for the librarian, merged at the site root.

mod pages;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::Module;
use sqlx::SqlitePool;

use crate::modules::lending::policy::LendingPolicy;

pub struct WebModule {
    db: SqlitePool,
    policy: LendingPolicy,
}

impl WebModule {
    pub fn new(db: SqlitePool, policy: LendingPolicy) -> Self {
        Self { db, policy }
    }
}

#[async_trait]
impl Module for WebModule {
    fn name(&self) -> &'static str {
        "web"
    }

    fn mount_path(&self) -> String {
        "/".to_string()
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone(), self.policy.clone())
    }
}

/// Create a new instance of the web module
pub fn create_module(db: SqlitePool, policy: LendingPolicy) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(WebModule::new(db, policy))
}
