use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use libris_http::error::AppError;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::pages;
use crate::{
    error::LibraryError,
    modules::{
        catalog::{
            models::{BookStatus, NewBook},
            service as catalog,
        },
        ledger::store as ledger,
        lending::{models::CheckoutRequest, policy::LendingPolicy, service as lending},
        members::{
            models::{BalanceAdjustment, NewMember},
            service as members,
        },
    },
};

#[derive(Clone)]
struct WebState {
    db: SqlitePool,
    policy: LendingPolicy,
}

/// Failure rendered as an HTML page with the status the JSON API would use.
struct PageError(AppError);

impl From<LibraryError> for PageError {
    fn from(err: LibraryError) -> Self {
        Self(AppError::from(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.0.report();
        let status = self.0.status();
        let page = pages::error(status, &self.0.public_message());
        (status, Html(page.into_string())).into_response()
    }
}

type Page = Result<Html<String>, PageError>;

/// HTML routes for the librarian, merged at the site root.
pub fn router(db: SqlitePool, policy: LendingPolicy) -> Router {
    Router::new()
        .route("/", get(catalog_page))
        .route("/books/new", get(new_book_page).post(register_book))
        .route("/members", get(members_page).post(register_member))
        .route("/members/{member_id}/delete", post(delete_member))
        .route(
            "/members/{member_id}/balance",
            get(balance_page).post(adjust_balance),
        )
        .route("/transactions", get(transactions_page))
        .route("/checkout/{book_id}", get(checkout_page).post(checkout))
        .route("/returns", get(returns_page))
        .route("/returns/{book_id}", post(return_book))
        .with_state(WebState { db, policy })
}

async fn catalog_page(State(state): State<WebState>) -> Page {
    let books = catalog::list_books(&state.db, BookStatus::All).await?;
    Ok(Html(pages::catalog(&books).into_string()))
}

async fn new_book_page() -> Html<String> {
    Html(pages::new_book().into_string())
}

async fn register_book(
    State(state): State<WebState>,
    Form(form): Form<NewBook>,
) -> Result<Redirect, PageError> {
    catalog::register_book(&state.db, &form).await?;
    Ok(Redirect::to("/"))
}

async fn members_page(State(state): State<WebState>) -> Page {
    let roster = members::list_members(&state.db, false).await?;
    Ok(Html(
        pages::members(&roster, state.policy.opening_balance()).into_string(),
    ))
}

async fn register_member(
    State(state): State<WebState>,
    Form(form): Form<NewMember>,
) -> Result<Redirect, PageError> {
    members::register_member(&state.db, &form, state.policy.opening_balance()).await?;
    Ok(Redirect::to("/members"))
}

async fn delete_member(
    State(state): State<WebState>,
    Path(member_id): Path<i64>,
) -> Result<Redirect, PageError> {
    members::delete_member(&state.db, member_id).await?;
    Ok(Redirect::to("/members"))
}

async fn balance_page(State(state): State<WebState>, Path(member_id): Path<i64>) -> Page {
    let member = members::get_member(&state.db, member_id).await?;
    Ok(Html(pages::balance_form(&member).into_string()))
}

async fn adjust_balance(
    State(state): State<WebState>,
    Path(member_id): Path<i64>,
    Form(adjustment): Form<BalanceAdjustment>,
) -> Result<Redirect, PageError> {
    members::adjust_balance(&state.db, member_id, &adjustment.amount).await?;
    Ok(Redirect::to("/members"))
}

async fn transactions_page(State(state): State<WebState>) -> Page {
    let entries = ledger::list(&state.db).await.map_err(LibraryError::from)?;
    Ok(Html(pages::transactions(&entries).into_string()))
}

async fn checkout_page(State(state): State<WebState>, Path(book_id): Path<i64>) -> Page {
    let book = catalog::get_book(&state.db, book_id).await?;
    if !book.is_available() {
        return Err(LibraryError::BookUnavailable(book_id).into());
    }
    let eligible = members::list_members(&state.db, true).await?;
    Ok(Html(
        pages::checkout_form(&book, &eligible, state.policy.deposit()).into_string(),
    ))
}

async fn checkout(
    State(state): State<WebState>,
    Path(book_id): Path<i64>,
    Form(request): Form<CheckoutRequest>,
) -> Result<Redirect, PageError> {
    lending::checkout(
        &state.db,
        &state.policy,
        book_id,
        &request.member_id,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Redirect::to("/"))
}

async fn returns_page(State(state): State<WebState>) -> Page {
    let books = catalog::list_books(&state.db, BookStatus::CheckedOut).await?;
    Ok(Html(pages::returns(&books).into_string()))
}

async fn return_book(State(state): State<WebState>, Path(book_id): Path<i64>) -> Page {
    let summary =
        lending::return_book(&state.db, &state.policy, book_id, OffsetDateTime::now_utc()).await?;
    Ok(Html(pages::return_summary(&summary).into_string()))
}
