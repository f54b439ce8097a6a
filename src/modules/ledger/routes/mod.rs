use axum::{extract::State, routing::get, Json, Router};
use libris_http::error::AppError;
use sqlx::SqlitePool;

use super::{models::Transaction, store};
use crate::error::LibraryError;

/// JSON routes for the ledger, mounted under `/api/ledger`.
pub fn router(db: SqlitePool) -> Router {
    Router::new()
        .route("/transactions", get(list_transactions))
        .with_state(db)
}

async fn list_transactions(State(db): State<SqlitePool>) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = store::list(&db).await.map_err(LibraryError::from)?;
    Ok(Json(transactions))
}
