//! Catalog store: book records, their availability and issue counts.

pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

pub struct CatalogModule {
    db: SqlitePool,
}

impl CatalogModule {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Catalog"],
                        "parameters": [{
                            "name": "status",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "string", "enum": ["all", "available", "checked_out"] }
                        }],
                        "responses": {
                            "200": {
                                "description": "Books ordered by id",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Book" }
                                } } }
                            }
                        }
                    },
                    "post": {
                        "summary": "Register a book",
                        "tags": ["Catalog"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewBook" } } }
                        },
                        "responses": {
                            "201": {
                                "description": "Book registered",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } }
                            },
                            "409": {
                                "description": "Book id already exists",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
                            },
                            "422": {
                                "description": "Book id is not numeric",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
                            }
                        }
                    }
                },
                "/books/{book_id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Catalog"],
                        "parameters": [{ "name": "book_id", "in": "path", "required": true, "schema": { "type": "integer" } }],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } }
                            },
                            "404": {
                                "description": "No such book",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "book_id": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "publisher": { "type": "string" },
                            "isbn": { "type": "string", "nullable": true },
                            "quantity": { "type": "integer", "description": "1 on the shelf, 0 checked out" },
                            "borrower_id": { "type": "integer", "nullable": true },
                            "times_issued": { "type": "integer" }
                        },
                        "required": ["book_id", "title", "author", "publisher", "quantity", "times_issued"]
                    },
                    "NewBook": {
                        "type": "object",
                        "properties": {
                            "book_id": { "type": "string", "description": "Digits only" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "publisher": { "type": "string" },
                            "isbn": { "type": "string" }
                        },
                        "required": ["book_id"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_books",
            up: r#"
                CREATE TABLE books (
                    book_id      INTEGER PRIMARY KEY NOT NULL CHECK (book_id >= 0),
                    title        TEXT    NOT NULL,
                    author       TEXT    NOT NULL,
                    publisher    TEXT    NOT NULL,
                    isbn         TEXT,
                    quantity     INTEGER NOT NULL DEFAULT 1 CHECK (quantity IN (0, 1)),
                    borrower_id  INTEGER REFERENCES members (member_id),
                    times_issued INTEGER NOT NULL DEFAULT 0,
                    CHECK ((quantity = 0) = (borrower_id IS NOT NULL))
                );
                CREATE INDEX books_borrower ON books (borrower_id);
                "#,
        }]
    }
}

/// Create a new instance of the catalog module
pub fn create_module(db: SqlitePool) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CatalogModule::new(db))
}
