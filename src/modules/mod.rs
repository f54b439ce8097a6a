pub mod catalog;
pub mod ledger;
pub mod lending;
pub mod members;
pub mod web;

use libris_kernel::{settings::Settings, ModuleRegistry};
use sqlx::SqlitePool;

use lending::policy::LendingPolicy;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &SqlitePool, settings: &Settings) {
    let policy = LendingPolicy::from(&settings.lending);

    registry.register_custom(catalog::create_module(db.clone()));
    registry.register_custom(members::create_module(
        db.clone(),
        policy.opening_balance(),
    ));
    registry.register_custom(ledger::create_module(db.clone()));
    registry.register_custom(lending::create_module(db.clone(), policy.clone()));
    registry.register_custom(web::create_module(db.clone(), policy));
}
