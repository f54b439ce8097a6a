use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use libris_http::error::AppError;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::{
    models::{CheckoutReceipt, CheckoutRequest, ReturnSummary},
    policy::LendingPolicy,
    service,
};

#[derive(Clone)]
struct LendingState {
    db: SqlitePool,
    policy: LendingPolicy,
}

/// JSON routes for checkout and return, mounted under `/api/lending`.
pub fn router(db: SqlitePool, policy: LendingPolicy) -> Router {
    Router::new()
        .route("/checkout/{book_id}", post(checkout))
        .route("/return/{book_id}", post(return_book))
        .with_state(LendingState { db, policy })
}

async fn checkout(
    State(state): State<LendingState>,
    Path(book_id): Path<i64>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutReceipt>, AppError> {
    let receipt = service::checkout(
        &state.db,
        &state.policy,
        book_id,
        &request.member_id,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Json(receipt))
}

async fn return_book(
    State(state): State<LendingState>,
    Path(book_id): Path<i64>,
) -> Result<Json<ReturnSummary>, AppError> {
    let summary =
        service::return_book(&state.db, &state.policy, book_id, OffsetDateTime::now_utc()).await?;
    Ok(Json(summary))
}
