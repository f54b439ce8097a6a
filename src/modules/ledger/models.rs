use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Whether a ledger entry records a book going out or coming back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Direction {
    Checkout,
    Return,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Checkout => "Checked out",
            Direction::Return => "Returned",
        }
    }
}

/// One append-only ledger entry.
///
/// Title and name are copies taken at event time; the ids are kept so
/// lookups do not depend on names staying unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub book_title: String,
    pub member_name: String,
    pub direction: Direction,
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

/// Entry to append; the store assigns the sequence number.
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub book_id: i64,
    pub member_id: i64,
    pub book_title: &'a str,
    pub member_name: &'a str,
    pub direction: Direction,
    pub occurred_at: OffsetDateTime,
}
