//! Domain errors raised by the catalog, member and lending workflows.

use libris_http::error::AppError;
use serde_json::json;
use thiserror::Error;

/// Broad class of a [`LibraryError`], used to pick the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input had the wrong shape; nothing was read or written.
    Validation,
    /// A referenced book or member does not exist.
    NotFound,
    /// The request is well formed but the library's rules refuse it.
    BusinessRule,
    /// The store failed; the unit of work was rolled back.
    Persistence,
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Enter a numeric member id")]
    InvalidMemberId,

    #[error("Book ID must be numeric. Please enter a valid book ID")]
    InvalidBookId,

    #[error("Please enter a correct name; only letters and spaces are allowed")]
    InvalidName,

    #[error("Please enter a correct balance; a whole non-negative number is required")]
    InvalidBalance,

    #[error("Please enter a whole amount such as 200 or -50")]
    InvalidAmount,

    #[error("Not a member!")]
    NotAMember(i64),

    #[error("Book {0} is not in our system")]
    BookNotFound(i64),

    #[error("{name}'s balance is {balance} which is less than {floor}, kindly top up before borrowing books.")]
    OverLimit {
        name: String,
        balance: i64,
        floor: i64,
    },

    #[error("{name} has already borrowed a book and is not currently eligible")]
    AlreadyBorrowing { name: String },

    #[error("Book {0} is already checked out")]
    BookUnavailable(i64),

    #[error("Book {0} is not checked out")]
    BookNotCheckedOut(i64),

    #[error("No checkout record found for book {0}")]
    NoCheckoutRecord(i64),

    #[error("Book ID {0} already exists in the database")]
    DuplicateBook(i64),

    #[error("{name} still has a book checked out and cannot be deleted")]
    MemberHasLoan { name: String },

    #[error("{name}'s account cannot take this charge; the amount is out of range")]
    BalanceOutOfRange { name: String },

    #[error("Unexpected error occurred")]
    Store(#[from] sqlx::Error),
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::InvalidMemberId
            | LibraryError::InvalidBookId
            | LibraryError::InvalidName
            | LibraryError::InvalidBalance
            | LibraryError::InvalidAmount => ErrorKind::Validation,
            LibraryError::NotAMember(_) | LibraryError::BookNotFound(_) => ErrorKind::NotFound,
            LibraryError::OverLimit { .. }
            | LibraryError::AlreadyBorrowing { .. }
            | LibraryError::BookUnavailable(_)
            | LibraryError::BookNotCheckedOut(_)
            | LibraryError::NoCheckoutRecord(_)
            | LibraryError::DuplicateBook(_)
            | LibraryError::MemberHasLoan { .. }
            | LibraryError::BalanceOutOfRange { .. } => ErrorKind::BusinessRule,
            LibraryError::Store(_) => ErrorKind::Persistence,
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            LibraryError::InvalidMemberId
            | LibraryError::InvalidBookId
            | LibraryError::InvalidName
            | LibraryError::InvalidBalance
            | LibraryError::InvalidAmount => "validation_error",
            LibraryError::NotAMember(_) => "member_not_found",
            LibraryError::BookNotFound(_) => "book_not_found",
            LibraryError::OverLimit { .. } => "over_limit",
            LibraryError::AlreadyBorrowing { .. } => "already_borrowing",
            LibraryError::BookUnavailable(_) => "book_unavailable",
            LibraryError::BookNotCheckedOut(_) => "book_not_checked_out",
            LibraryError::NoCheckoutRecord(_) => "no_checkout_record",
            LibraryError::DuplicateBook(_) => "duplicate_book",
            LibraryError::MemberHasLoan { .. } => "member_has_loan",
            LibraryError::BalanceOutOfRange { .. } => "balance_out_of_range",
            LibraryError::Store(_) => "internal_error",
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            LibraryError::InvalidMemberId => Some("member_id"),
            LibraryError::InvalidBookId => Some("book_id"),
            LibraryError::InvalidName => Some("name"),
            LibraryError::InvalidBalance => Some("balance"),
            LibraryError::InvalidAmount => Some("amount"),
            _ => None,
        }
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Store(cause) => AppError::Internal(anyhow::Error::new(cause)),
            err if err.kind() == ErrorKind::Validation => {
                let details = err
                    .field()
                    .map(|field| vec![json!({ "field": field, "error": "invalid" })])
                    .unwrap_or_default();
                AppError::validation(details, err.to_string())
            }
            err if err.kind() == ErrorKind::NotFound => {
                AppError::not_found(err.to_string()).with_code(err.code())
            }
            err => AppError::conflict(vec![], err.to_string()).with_code(err.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use libris_http::error::INTERNAL_MESSAGE;

    #[test]
    fn over_limit_names_member_and_balance() {
        let err = LibraryError::OverLimit {
            name: "Ada".to_string(),
            balance: -600,
            floor: -500,
        };
        assert_eq!(
            err.to_string(),
            "Ada's balance is -600 which is less than -500, kindly top up before borrowing books."
        );
        assert_eq!(err.kind(), ErrorKind::BusinessRule);
    }

    #[test]
    fn kinds_map_to_statuses() {
        let cases = [
            (LibraryError::InvalidName, StatusCode::UNPROCESSABLE_ENTITY),
            (LibraryError::NotAMember(3), StatusCode::NOT_FOUND),
            (LibraryError::BookNotFound(3), StatusCode::NOT_FOUND),
            (LibraryError::NoCheckoutRecord(3), StatusCode::CONFLICT),
            (
                LibraryError::BalanceOutOfRange { name: "Ada".to_string() },
                StatusCode::CONFLICT,
            ),
            (LibraryError::Store(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn business_rule_codes_survive_conversion() {
        let app = AppError::from(LibraryError::AlreadyBorrowing {
            name: "Ada".to_string(),
        });
        assert_eq!(app.code(), "already_borrowing");
        assert_eq!(app.public_message(), "Ada has already borrowed a book and is not currently eligible");
    }

    #[test]
    fn store_errors_are_opaque() {
        let err = LibraryError::Store(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), INTERNAL_MESSAGE);
        assert_eq!(AppError::from(err).public_message(), INTERNAL_MESSAGE);
    }
}
