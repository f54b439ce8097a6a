//! Member workflows: registration, deletion and balance top-ups.

use sqlx::SqlitePool;

use super::{
    models::{Member, NewMember},
    store,
};
use crate::{
    error::LibraryError,
    utils::{collapse_whitespace, is_alphabetic_name, parse_digits, parse_signed},
};

/// Validate and insert a new member who is not borrowing and has paid nothing.
///
/// A blank balance opens the account with `opening_balance`.
pub async fn register_member(
    db: &SqlitePool,
    form: &NewMember,
    opening_balance: i64,
) -> Result<Member, LibraryError> {
    if !is_alphabetic_name(&form.name) {
        return Err(LibraryError::InvalidName);
    }
    let balance = if form.balance.trim().is_empty() {
        opening_balance
    } else {
        parse_digits(&form.balance).ok_or(LibraryError::InvalidBalance)?
    };
    let name = collapse_whitespace(&form.name);

    let mut tx = db.begin().await?;
    let member = store::insert(&mut *tx, &name, balance).await?;
    tx.commit().await?;

    tracing::info!(member_id = member.member_id, name = %member.name, balance, "member registered");
    Ok(member)
}

pub async fn get_member(db: &SqlitePool, member_id: i64) -> Result<Member, LibraryError> {
    store::find(db, member_id)
        .await?
        .ok_or(LibraryError::NotAMember(member_id))
}

pub async fn list_members(db: &SqlitePool, eligible_only: bool) -> Result<Vec<Member>, LibraryError> {
    Ok(store::list(db, eligible_only).await?)
}

/// Remove a member who holds no book. Their ledger entries are kept.
pub async fn delete_member(db: &SqlitePool, member_id: i64) -> Result<Member, LibraryError> {
    let mut tx = db.begin().await?;
    let member = store::find(&mut *tx, member_id)
        .await?
        .ok_or(LibraryError::NotAMember(member_id))?;
    if member.is_borrowing || store::delete(&mut *tx, member_id).await? == 0 {
        return Err(LibraryError::MemberHasLoan { name: member.name });
    }
    tx.commit().await?;

    tracing::info!(member_id, name = %member.name, "member deleted");
    Ok(member)
}

/// Add a signed amount to the member's balance.
///
/// An amount that would push the balance past the `i64` range is rejected
/// as invalid before anything is written.
pub async fn adjust_balance(db: &SqlitePool, member_id: i64, amount: &str) -> Result<Member, LibraryError> {
    let amount = parse_signed(amount).ok_or(LibraryError::InvalidAmount)?;

    let mut tx = db.begin().await?;
    let current = store::find(&mut *tx, member_id)
        .await?
        .ok_or(LibraryError::NotAMember(member_id))?;
    let balance = current
        .balance
        .checked_add(amount)
        .ok_or(LibraryError::InvalidAmount)?;
    let member = store::set_balance(&mut *tx, member_id, balance)
        .await?
        .ok_or(LibraryError::NotAMember(member_id))?;
    tx.commit().await?;

    tracing::info!(member_id, amount, balance = member.balance, "balance adjusted");
    Ok(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, testing};

    fn form(name: &str, balance: &str) -> NewMember {
        NewMember {
            name: name.to_string(),
            balance: balance.to_string(),
        }
    }

    #[tokio::test]
    async fn registration_starts_idle() {
        let db = testing::db().await;

        let member = register_member(&db, &form("  Ada   Lovelace ", "750"), 1000)
            .await
            .unwrap();
        assert_eq!(member.name, "Ada Lovelace");
        assert_eq!(member.balance, 750);
        assert!(!member.is_borrowing);
        assert_eq!(member.fees_paid, 0);
        assert_eq!(get_member(&db, member.member_id).await.unwrap(), member);
    }

    #[tokio::test]
    async fn blank_balance_uses_opening_balance() {
        let db = testing::db().await;
        let member = register_member(&db, &form("Grace", " "), 1000).await.unwrap();
        assert_eq!(member.balance, 1000);
    }

    #[tokio::test]
    async fn invalid_registration_leaves_store_untouched() {
        let db = testing::db().await;

        let err = register_member(&db, &form("R2D2", "100"), 1000).await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidName));
        assert_eq!(err.kind(), ErrorKind::Validation);

        for balance in ["-10", "12.5", "lots"] {
            let err = register_member(&db, &form("Grace", balance), 1000)
                .await
                .unwrap_err();
            assert!(matches!(err, LibraryError::InvalidBalance), "{balance:?}");
        }

        assert!(list_members(&db, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ids_are_assigned_by_the_store() {
        let db = testing::db().await;
        let first = register_member(&db, &form("Ada", "1"), 1000).await.unwrap();
        let second = register_member(&db, &form("Grace", "2"), 1000).await.unwrap();
        assert!(second.member_id > first.member_id);

        let names: Vec<String> = list_members(&db, false)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[tokio::test]
    async fn delete_removes_idle_member() {
        let db = testing::db().await;
        let member = register_member(&db, &form("Ada", "100"), 1000).await.unwrap();

        delete_member(&db, member.member_id).await.unwrap();
        let err = get_member(&db, member.member_id).await.unwrap_err();
        assert!(matches!(err, LibraryError::NotAMember(_)));

        let err = delete_member(&db, member.member_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn balance_adjustment_is_signed() {
        let db = testing::db().await;
        let member = register_member(&db, &form("Ada", "100"), 1000).await.unwrap();

        let member = adjust_balance(&db, member.member_id, "+250").await.unwrap();
        assert_eq!(member.balance, 350);
        let member = adjust_balance(&db, member.member_id, "-400").await.unwrap();
        assert_eq!(member.balance, -50);

        let err = adjust_balance(&db, member.member_id, "ten").await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidAmount));
        let err = adjust_balance(&db, 999, "10").await.unwrap_err();
        assert!(matches!(err, LibraryError::NotAMember(999)));

        assert_eq!(get_member(&db, member.member_id).await.unwrap().balance, -50);
    }

    #[tokio::test]
    async fn adjustment_past_i64_range_is_rejected_before_writing() {
        let db = testing::db().await;
        let rich = register_member(&db, &form("Midas", "9223372036854775000"), 1000)
            .await
            .unwrap();

        let err = adjust_balance(&db, rich.member_id, "+1000").await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidAmount));
        assert_eq!(err.kind(), ErrorKind::Validation);

        let poorer = adjust_balance(&db, rich.member_id, "-9223372036854775807").await.unwrap();
        assert_eq!(poorer.balance, -807);
        let err = adjust_balance(&db, rich.member_id, "-9223372036854775807").await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidAmount));

        let stored: String = sqlx::query_scalar("SELECT typeof(balance) FROM members WHERE member_id = ?")
            .bind(rich.member_id)
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(stored, "integer");
        let roster = list_members(&db, false).await.unwrap();
        assert_eq!(roster[0].balance, -807);
    }

    #[tokio::test]
    async fn schema_refuses_non_integer_balances() {
        let db = testing::db().await;
        let member = register_member(&db, &form("Ada", "10"), 1000).await.unwrap();

        let result = sqlx::query("UPDATE members SET balance = balance + 9223372036854775807 WHERE member_id = ?")
            .bind(member.member_id)
            .execute(&db)
            .await;
        assert!(result.is_err());
        assert_eq!(get_member(&db, member.member_id).await.unwrap().balance, 10);
    }
}
