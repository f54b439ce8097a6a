use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::string_or_number;

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Book {
    /// Externally assigned catalog number
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub isbn: Option<String>,
    /// Copies on the shelf: 1 when available, 0 while checked out
    pub quantity: i64,
    /// Member currently holding the book
    pub borrower_id: Option<i64>,
    /// Lifetime number of checkouts
    pub times_issued: i64,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.borrower_id.is_none()
    }
}

/// Registration request for a new book, fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    #[serde(default, deserialize_with = "string_or_number")]
    pub book_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub isbn: String,
}

/// Which books a catalog listing should include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    #[default]
    All,
    Available,
    CheckedOut,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookFilter {
    #[serde(default)]
    pub status: BookStatus,
}
