//! SQL access for the `transactions` table. Rows are only ever inserted.

use sqlx::SqliteExecutor;

use super::models::{Direction, NewTransaction, Transaction};

macro_rules! columns {
    () => {
        "id, book_id, member_id, book_title, member_name, direction, occurred_at"
    };
}

pub async fn append<'e>(
    db: impl SqliteExecutor<'e>,
    entry: &NewTransaction<'_>,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(concat!(
        "INSERT INTO transactions (book_id, member_id, book_title, member_name, direction, occurred_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING ",
        columns!()
    ))
    .bind(entry.book_id)
    .bind(entry.member_id)
    .bind(entry.book_title)
    .bind(entry.member_name)
    .bind(entry.direction)
    .bind(entry.occurred_at)
    .fetch_one(db)
    .await
}

/// Every entry, newest first; equal timestamps fall back to sequence order.
pub async fn list<'e>(db: impl SqliteExecutor<'e>) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(concat!(
        "SELECT ",
        columns!(),
        " FROM transactions ORDER BY julianday(occurred_at) DESC, id DESC"
    ))
    .fetch_all(db)
    .await
}

/// The checkout that started the book's current loan: the highest-numbered
/// checkout entry for that book.
pub async fn latest_checkout<'e>(
    db: impl SqliteExecutor<'e>,
    book_id: i64,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(concat!(
        "SELECT ",
        columns!(),
        " FROM transactions WHERE book_id = ? AND direction = ? ORDER BY id DESC LIMIT 1"
    ))
    .bind(book_id)
    .bind(Direction::Checkout)
    .fetch_optional(db)
    .await
}
