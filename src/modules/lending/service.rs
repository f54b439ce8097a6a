//! Checkout and return. Each runs as one database transaction: every
//! precondition is checked first, then books, members and the ledger are
//! updated together or not at all.

use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::{
    models::{CheckoutReceipt, ReturnSummary},
    policy::LendingPolicy,
};
use crate::{
    error::LibraryError,
    modules::{
        catalog::store as books,
        ledger::{
            models::{Direction, NewTransaction},
            store as ledger,
        },
        members::{models::Member, store as members},
    },
    utils::parse_digits,
};

/// Taking `amount` must leave both the balance and the fees total in range.
fn check_charge(member: &Member, amount: i64) -> Result<(), LibraryError> {
    member
        .balance
        .checked_sub(amount)
        .and(member.fees_paid.checked_add(amount))
        .map(|_| ())
        .ok_or_else(|| LibraryError::BalanceOutOfRange {
            name: member.name.clone(),
        })
}

/// Lend `book_id` to the member whose id was submitted as `member_id`.
///
/// The member is charged the policy deposit and the book leaves the shelf.
pub async fn checkout(
    db: &SqlitePool,
    policy: &LendingPolicy,
    book_id: i64,
    member_id: &str,
    now: OffsetDateTime,
) -> Result<CheckoutReceipt, LibraryError> {
    let member_id = parse_digits(member_id)
        .filter(|id| *id > 0)
        .ok_or(LibraryError::InvalidMemberId)?;

    let mut tx = db.begin().await?;

    let member = members::find(&mut *tx, member_id)
        .await?
        .ok_or(LibraryError::NotAMember(member_id))?;
    if !policy.may_borrow(member.balance) {
        return Err(LibraryError::OverLimit {
            name: member.name,
            balance: member.balance,
            floor: policy.overdraft_floor(),
        });
    }
    if member.is_borrowing {
        return Err(LibraryError::AlreadyBorrowing { name: member.name });
    }

    let book = books::find(&mut *tx, book_id)
        .await?
        .ok_or(LibraryError::BookNotFound(book_id))?;
    if !book.is_available() {
        return Err(LibraryError::BookUnavailable(book_id));
    }
    check_charge(&member, policy.deposit())?;

    // Conditional updates: a concurrent checkout that committed after our
    // reads leaves zero rows matched here.
    let member = members::take_deposit(&mut *tx, member_id, policy.deposit())
        .await?
        .ok_or(LibraryError::AlreadyBorrowing { name: member.name })?;
    let book = books::lend(&mut *tx, book_id, member_id)
        .await?
        .ok_or(LibraryError::BookUnavailable(book_id))?;

    let transaction = ledger::append(
        &mut *tx,
        &NewTransaction {
            book_id,
            member_id,
            book_title: &book.title,
            member_name: &member.name,
            direction: Direction::Checkout,
            occurred_at: now,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        book_id,
        member_id,
        deposit = policy.deposit(),
        balance = member.balance,
        "book checked out"
    );
    Ok(CheckoutReceipt {
        book,
        member,
        transaction,
    })
}

/// Take `book_id` back from its borrower and charge the late fee for the
/// whole days since the loan's checkout entry.
pub async fn return_book(
    db: &SqlitePool,
    policy: &LendingPolicy,
    book_id: i64,
    now: OffsetDateTime,
) -> Result<ReturnSummary, LibraryError> {
    let mut tx = db.begin().await?;

    let book = books::find(&mut *tx, book_id)
        .await?
        .ok_or(LibraryError::BookNotFound(book_id))?;
    let member_id = book
        .borrower_id
        .ok_or(LibraryError::BookNotCheckedOut(book_id))?;
    let member = members::find(&mut *tx, member_id)
        .await?
        .ok_or(LibraryError::NotAMember(member_id))?;
    let checked_out = ledger::latest_checkout(&mut *tx, book_id)
        .await?
        .ok_or(LibraryError::NoCheckoutRecord(book_id))?;

    let late_fee = policy.late_fee(checked_out.occurred_at, now);
    check_charge(&member, late_fee.amount)?;

    let member = members::charge_return(&mut *tx, member_id, late_fee.amount)
        .await?
        .ok_or(LibraryError::BookNotCheckedOut(book_id))?;
    let book = books::shelve(&mut *tx, book_id, member_id)
        .await?
        .ok_or(LibraryError::BookNotCheckedOut(book_id))?;

    let transaction = ledger::append(
        &mut *tx,
        &NewTransaction {
            book_id,
            member_id,
            book_title: &book.title,
            member_name: &member.name,
            direction: Direction::Return,
            occurred_at: now,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        book_id,
        member_id,
        days = late_fee.days,
        fee = late_fee.amount,
        balance = member.balance,
        "book returned"
    );
    Ok(ReturnSummary {
        book,
        member,
        transaction,
        late_fee,
    })
}
