//! Catalog workflows: registering and looking up books.

use sqlx::SqlitePool;

use super::{
    models::{Book, BookStatus, NewBook},
    store,
};
use crate::{
    error::LibraryError,
    utils::{non_blank, parse_digits},
};

/// Validate and insert a new book, available and never issued.
pub async fn register_book(db: &SqlitePool, form: &NewBook) -> Result<Book, LibraryError> {
    let book_id = parse_digits(&form.book_id).ok_or(LibraryError::InvalidBookId)?;

    let book = Book {
        book_id,
        title: form.title.trim().to_string(),
        author: form.author.trim().to_string(),
        publisher: form.publisher.trim().to_string(),
        isbn: non_blank(&form.isbn),
        quantity: 1,
        borrower_id: None,
        times_issued: 0,
    };

    let mut tx = db.begin().await?;
    if store::find(&mut *tx, book_id).await?.is_some() {
        return Err(LibraryError::DuplicateBook(book_id));
    }
    store::insert(&mut *tx, &book).await.map_err(|err| {
        // Lost a race with another registration of the same id.
        let duplicate = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if duplicate {
            LibraryError::DuplicateBook(book_id)
        } else {
            LibraryError::Store(err)
        }
    })?;
    tx.commit().await?;

    tracing::info!(book_id, title = %book.title, "book registered");
    Ok(book)
}

pub async fn get_book(db: &SqlitePool, book_id: i64) -> Result<Book, LibraryError> {
    store::find(db, book_id)
        .await?
        .ok_or(LibraryError::BookNotFound(book_id))
}

pub async fn list_books(db: &SqlitePool, status: BookStatus) -> Result<Vec<Book>, LibraryError> {
    Ok(store::list(db, status).await?)
}
