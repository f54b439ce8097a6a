//! Transaction ledger: the append-only history of checkouts and returns.

pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{Migration, Module};
use sqlx::SqlitePool;

pub struct LedgerModule {
    db: SqlitePool,
}

impl LedgerModule {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for LedgerModule {
    fn name(&self) -> &'static str {
        "ledger"
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/transactions": {
                    "get": {
                        "summary": "List checkouts and returns, newest first",
                        "tags": ["Ledger"],
                        "responses": {
                            "200": {
                                "description": "Ledger entries",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Transaction" }
                                } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Transaction": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "book_id": { "type": "integer" },
                            "member_id": { "type": "integer" },
                            "book_title": { "type": "string" },
                            "member_name": { "type": "string" },
                            "direction": { "type": "string", "enum": ["checkout", "return"] },
                            "occurred_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "book_id", "member_id", "book_title", "member_name", "direction", "occurred_at"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        // No foreign keys: entries outlive deleted members.
        vec![Migration {
            id: "001_transactions",
            up: r#"
                CREATE TABLE transactions (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    book_id     INTEGER NOT NULL,
                    member_id   INTEGER NOT NULL,
                    book_title  TEXT    NOT NULL,
                    member_name TEXT    NOT NULL,
                    direction   TEXT    NOT NULL CHECK (direction IN ('checkout', 'return')),
                    occurred_at TEXT    NOT NULL
                );
                CREATE INDEX transactions_book ON transactions (book_id, direction, id);
                "#,
        }]
    }
}

/// Create a new instance of the ledger module
pub fn create_module(db: SqlitePool) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(LedgerModule::new(db))
}
