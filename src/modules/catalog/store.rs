//! SQL access for the `books` table.

use sqlx::SqliteExecutor;

use super::models::{Book, BookStatus};

macro_rules! columns {
    () => {
        "book_id, title, author, publisher, isbn, quantity, borrower_id, times_issued"
    };
}

pub async fn find<'e>(db: impl SqliteExecutor<'e>, book_id: i64) -> Result<Option<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(concat!("SELECT ", columns!(), " FROM books WHERE book_id = ?"))
        .bind(book_id)
        .fetch_optional(db)
        .await
}

pub async fn list<'e>(db: impl SqliteExecutor<'e>, status: BookStatus) -> Result<Vec<Book>, sqlx::Error> {
    let sql = match status {
        BookStatus::All => concat!("SELECT ", columns!(), " FROM books ORDER BY book_id"),
        BookStatus::Available => concat!(
            "SELECT ",
            columns!(),
            " FROM books WHERE quantity = 1 ORDER BY book_id"
        ),
        BookStatus::CheckedOut => concat!(
            "SELECT ",
            columns!(),
            " FROM books WHERE quantity = 0 ORDER BY book_id"
        ),
    };
    sqlx::query_as::<_, Book>(sql).fetch_all(db).await
}

pub async fn insert<'e>(db: impl SqliteExecutor<'e>, book: &Book) -> Result<(), sqlx::Error> {
    sqlx::query(concat!(
        "INSERT INTO books (",
        columns!(),
        ") VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(book.book_id)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.publisher)
    .bind(&book.isbn)
    .bind(book.quantity)
    .bind(book.borrower_id)
    .bind(book.times_issued)
    .execute(db)
    .await?;
    Ok(())
}

/// Hand the book to `member_id` if it is still on the shelf.
///
/// Returns `None` when the book is already out, e.g. a concurrent checkout
/// committed first.
pub async fn lend<'e>(
    db: impl SqliteExecutor<'e>,
    book_id: i64,
    member_id: i64,
) -> Result<Option<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(concat!(
        "UPDATE books SET quantity = 0, borrower_id = ?, times_issued = times_issued + 1 \
         WHERE book_id = ? AND borrower_id IS NULL RETURNING ",
        columns!()
    ))
    .bind(member_id)
    .bind(book_id)
    .fetch_optional(db)
    .await
}

/// Put the book back on the shelf if `member_id` still holds it.
pub async fn shelve<'e>(
    db: impl SqliteExecutor<'e>,
    book_id: i64,
    member_id: i64,
) -> Result<Option<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(concat!(
        "UPDATE books SET quantity = 1, borrower_id = NULL \
         WHERE book_id = ? AND borrower_id = ? RETURNING ",
        columns!()
    ))
    .bind(book_id)
    .bind(member_id)
    .fetch_optional(db)
    .await
}
