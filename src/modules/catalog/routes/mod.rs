use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use libris_http::error::AppError;
use sqlx::SqlitePool;

use super::{
    models::{Book, BookFilter, NewBook},
    service,
};

/// JSON routes for the catalog, mounted under `/api/catalog`.
pub fn router(db: SqlitePool) -> Router {
    Router::new()
        .route("/books", get(list_books).post(register_book))
        .route("/books/{book_id}", get(get_book))
        .with_state(db)
}

async fn list_books(
    State(db): State<SqlitePool>,
    Query(filter): Query<BookFilter>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service::list_books(&db, filter.status).await?))
}

async fn register_book(
    State(db): State<SqlitePool>,
    Json(form): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = service::register_book(&db, &form).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(db): State<SqlitePool>,
    Path(book_id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service::get_book(&db, book_id).await?))
}
