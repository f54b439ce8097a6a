//! Member store: the roster, balances and borrowing flags.

pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

pub struct MembersModule {
    db: SqlitePool,
    opening_balance: i64,
}

impl MembersModule {
    pub fn new(db: SqlitePool, opening_balance: i64) -> Self {
        Self {
            db,
            opening_balance,
        }
    }
}

#[async_trait]
impl Module for MembersModule {
    fn name(&self) -> &'static str {
        "members"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            opening_balance = self.opening_balance,
            "members module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone(), self.opening_balance)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let member_id = serde_json::json!({
            "name": "member_id", "in": "path", "required": true, "schema": { "type": "integer" }
        });
        let error = serde_json::json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
        });
        let member = serde_json::json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Member" } } }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List members",
                        "tags": ["Members"],
                        "parameters": [{
                            "name": "eligible", "in": "query", "required": false,
                            "schema": { "type": "boolean" },
                            "description": "Only members who are not borrowing"
                        }],
                        "responses": {
                            "200": {
                                "description": "Members ordered by id",
                                "content": { "application/json": { "schema": {
                                    "type": "array", "items": { "$ref": "#/components/schemas/Member" }
                                } } }
                            }
                        }
                    },
                    "post": {
                        "summary": "Register a member",
                        "tags": ["Members"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewMember" } } }
                        },
                        "responses": {
                            "201": { "description": "Member registered", "content": member["content"].clone() },
                            "422": { "description": "Name or balance rejected", "content": error["content"].clone() }
                        }
                    }
                },
                "/{member_id}": {
                    "get": {
                        "summary": "Get a member",
                        "tags": ["Members"],
                        "parameters": [member_id.clone()],
                        "responses": {
                            "200": { "description": "The member", "content": member["content"].clone() },
                            "404": { "description": "Not a member", "content": error["content"].clone() }
                        }
                    },
                    "delete": {
                        "summary": "Delete a member who holds no book",
                        "tags": ["Members"],
                        "parameters": [member_id.clone()],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": { "description": "Not a member", "content": error["content"].clone() },
                            "409": { "description": "Member still has a book", "content": error["content"].clone() }
                        }
                    }
                },
                "/{member_id}/balance": {
                    "post": {
                        "summary": "Add a signed amount to the balance",
                        "tags": ["Members"],
                        "parameters": [member_id],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "amount": { "type": "string", "example": "-50" } },
                                "required": ["amount"]
                            } } }
                        },
                        "responses": {
                            "200": { "description": "Updated member", "content": member["content"].clone() },
                            "404": { "description": "Not a member", "content": error["content"].clone() },
                            "422": { "description": "Amount is not a whole number", "content": error["content"].clone() }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Member": {
                        "type": "object",
                        "properties": {
                            "member_id": { "type": "integer" },
                            "name": { "type": "string" },
                            "balance": { "type": "integer" },
                            "is_borrowing": { "type": "boolean" },
                            "fees_paid": { "type": "integer" }
                        },
                        "required": ["member_id", "name", "balance", "is_borrowing", "fees_paid"]
                    },
                    "NewMember": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Letters and spaces" },
                            "balance": { "type": "string", "description": "Digits; blank for the opening balance" }
                        },
                        "required": ["name"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_members",
            up: r#"
                CREATE TABLE members (
                    member_id    INTEGER PRIMARY KEY AUTOINCREMENT,
                    name         TEXT    NOT NULL,
                    balance      INTEGER NOT NULL DEFAULT 1000 CHECK (typeof(balance) = 'integer'),
                    is_borrowing INTEGER NOT NULL DEFAULT 0 CHECK (is_borrowing IN (0, 1)),
                    fees_paid    INTEGER NOT NULL DEFAULT 0 CHECK (typeof(fees_paid) = 'integer')
                );
                "#,
        }]
    }
}

/// Create a new instance of the members module
pub fn create_module(db: SqlitePool, opening_balance: i64) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(MembersModule::new(db, opening_balance))
}
