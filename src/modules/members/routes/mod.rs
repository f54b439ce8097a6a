use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use libris_http::error::AppError;
use sqlx::SqlitePool;

use super::{
    models::{BalanceAdjustment, Member, MemberFilter, NewMember},
    service,
};

#[derive(Clone)]
struct MembersState {
    db: SqlitePool,
    opening_balance: i64,
}

/// JSON routes for the member roster, mounted under `/api/members`.
pub fn router(db: SqlitePool, opening_balance: i64) -> Router {
    Router::new()
        .route("/", get(list_members).post(register_member))
        .route("/{member_id}", get(get_member).delete(delete_member))
        .route("/{member_id}/balance", post(adjust_balance))
        .with_state(MembersState {
            db,
            opening_balance,
        })
}

async fn list_members(
    State(state): State<MembersState>,
    Query(filter): Query<MemberFilter>,
) -> Result<Json<Vec<Member>>, AppError> {
    Ok(Json(service::list_members(&state.db, filter.eligible).await?))
}

async fn register_member(
    State(state): State<MembersState>,
    Json(form): Json<NewMember>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let member = service::register_member(&state.db, &form, state.opening_balance).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn get_member(
    State(state): State<MembersState>,
    Path(member_id): Path<i64>,
) -> Result<Json<Member>, AppError> {
    Ok(Json(service::get_member(&state.db, member_id).await?))
}

async fn delete_member(
    State(state): State<MembersState>,
    Path(member_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service::delete_member(&state.db, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn adjust_balance(
    State(state): State<MembersState>,
    Path(member_id): Path<i64>,
    Json(adjustment): Json<BalanceAdjustment>,
) -> Result<Json<Member>, AppError> {
    Ok(Json(
        service::adjust_balance(&state.db, member_id, &adjustment.amount).await?,
    ))
}
