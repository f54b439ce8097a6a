//! SQL access for the `members` table.

use sqlx::SqliteExecutor;

use super::models::Member;

macro_rules! columns {
    () => {
        "member_id, name, balance, is_borrowing, fees_paid"
    };
}

pub async fn find<'e>(db: impl SqliteExecutor<'e>, member_id: i64) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(concat!("SELECT ", columns!(), " FROM members WHERE member_id = ?"))
        .bind(member_id)
        .fetch_optional(db)
        .await
}

pub async fn list<'e>(db: impl SqliteExecutor<'e>, eligible_only: bool) -> Result<Vec<Member>, sqlx::Error> {
    let sql = if eligible_only {
        concat!("SELECT ", columns!(), " FROM members WHERE is_borrowing = 0 ORDER BY member_id")
    } else {
        concat!("SELECT ", columns!(), " FROM members ORDER BY member_id")
    };
    sqlx::query_as::<_, Member>(sql).fetch_all(db).await
}

pub async fn insert<'e>(db: impl SqliteExecutor<'e>, name: &str, balance: i64) -> Result<Member, sqlx::Error> {
    sqlx::query_as::<_, Member>(concat!(
        "INSERT INTO members (name, balance) VALUES (?, ?) RETURNING ",
        columns!()
    ))
    .bind(name)
    .bind(balance)
    .fetch_one(db)
    .await
}

/// Returns the number of rows removed.
pub async fn delete<'e>(db: impl SqliteExecutor<'e>, member_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM members WHERE member_id = ? AND is_borrowing = 0")
        .bind(member_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Store an already computed balance.
pub async fn set_balance<'e>(
    db: impl SqliteExecutor<'e>,
    member_id: i64,
    balance: i64,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(concat!(
        "UPDATE members SET balance = ? WHERE member_id = ? RETURNING ",
        columns!()
    ))
    .bind(balance)
    .bind(member_id)
    .fetch_optional(db)
    .await
}

/// Mark the member as borrowing and take the deposit.
///
/// Returns `None` if the member is already borrowing.
pub async fn take_deposit<'e>(
    db: impl SqliteExecutor<'e>,
    member_id: i64,
    deposit: i64,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(concat!(
        "UPDATE members SET is_borrowing = 1, balance = balance - ?, fees_paid = fees_paid + ? \
         WHERE member_id = ? AND is_borrowing = 0 RETURNING ",
        columns!()
    ))
    .bind(deposit)
    .bind(deposit)
    .bind(member_id)
    .fetch_optional(db)
    .await
}

/// Clear the borrowing flag and charge the late fee.
///
/// Returns `None` if the member was not borrowing.
pub async fn charge_return<'e>(
    db: impl SqliteExecutor<'e>,
    member_id: i64,
    fee: i64,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(concat!(
        "UPDATE members SET is_borrowing = 0, balance = balance - ?, fees_paid = fees_paid + ? \
         WHERE member_id = ? AND is_borrowing = 1 RETURNING ",
        columns!()
    ))
    .bind(fee)
    .bind(fee)
    .bind(member_id)
    .fetch_optional(db)
    .await
}
