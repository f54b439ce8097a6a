use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::string_or_number;

/// A library member and their account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Member {
    pub member_id: i64,
    pub name: String,
    /// May go negative; checkout is refused below the overdraft floor
    pub balance: i64,
    pub is_borrowing: bool,
    /// Deposits and late fees taken so far
    pub fees_paid: i64,
}

/// Registration request, fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMember {
    pub name: String,
    /// Blank means the configured opening balance
    #[serde(default, deserialize_with = "string_or_number")]
    pub balance: String,
}

/// Signed amount to add to a member's balance.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceAdjustment {
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MemberFilter {
    /// Only members free to borrow
    #[serde(default)]
    pub eligible: bool,
}
