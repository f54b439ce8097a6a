//! Lending: checkout and return across the catalog, members and ledger.

pub mod models;
pub mod policy;
pub mod routes;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Module};
use sqlx::SqlitePool;

use policy::LendingPolicy;

pub struct LendingModule {
    db: SqlitePool,
    policy: LendingPolicy,
}

impl LendingModule {
    pub fn new(db: SqlitePool, policy: LendingPolicy) -> Self {
        Self { db, policy }
    }
}

#[async_trait]
impl Module for LendingModule {
    fn name(&self) -> &'static str {
        "lending"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            deposit = self.policy.deposit(),
            overdraft_floor = self.policy.overdraft_floor(),
            "lending module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone(), self.policy.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_id = serde_json::json!({
            "name": "book_id", "in": "path", "required": true, "schema": { "type": "integer" }
        });
        let error = serde_json::json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
        });

        Some(serde_json::json!({
            "paths": {
                "/checkout/{book_id}": {
                    "post": {
                        "summary": "Lend a book to a member and hold the deposit",
                        "tags": ["Lending"],
                        "parameters": [book_id.clone()],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "member_id": { "type": "string", "example": "1" } },
                                "required": ["member_id"]
                            } } }
                        },
                        "responses": {
                            "200": {
                                "description": "Book, member and ledger entry after the checkout",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/CheckoutReceipt" } } }
                            },
                            "404": { "description": "Unknown member or book", "content": error["content"].clone() },
                            "409": { "description": "Over limit, already borrowing or book out", "content": error["content"].clone() },
                            "422": { "description": "Member id is not numeric", "content": error["content"].clone() }
                        }
                    }
                },
                "/return/{book_id}": {
                    "post": {
                        "summary": "Take a book back and charge the late fee",
                        "tags": ["Lending"],
                        "parameters": [book_id],
                        "responses": {
                            "200": {
                                "description": "Book, member, ledger entry and fee after the return",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ReturnSummary" } } }
                            },
                            "404": { "description": "Unknown book", "content": error["content"].clone() },
                            "409": { "description": "Book is not checked out", "content": error["content"].clone() }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "CheckoutReceipt": {
                        "type": "object",
                        "properties": {
                            "book": { "$ref": "#/components/schemas/Book" },
                            "member": { "$ref": "#/components/schemas/Member" },
                            "transaction": { "$ref": "#/components/schemas/Transaction" }
                        }
                    },
                    "ReturnSummary": {
                        "type": "object",
                        "properties": {
                            "book": { "$ref": "#/components/schemas/Book" },
                            "member": { "$ref": "#/components/schemas/Member" },
                            "transaction": { "$ref": "#/components/schemas/Transaction" },
                            "late_fee": {
                                "type": "object",
                                "properties": {
                                    "days": { "type": "integer" },
                                    "amount": { "type": "integer" }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the lending module
pub fn create_module(db: SqlitePool, policy: LendingPolicy) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(LendingModule::new(db, policy))
}
