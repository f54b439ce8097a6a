use serde::{Deserialize, Serialize};

use super::policy::LateFee;
use crate::{
    modules::{catalog::models::Book, ledger::models::Transaction, members::models::Member},
    utils::string_or_number,
};

/// Checkout request; the member id is validated by the workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub member_id: String,
}

/// State after a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub book: Book,
    pub member: Member,
    pub transaction: Transaction,
}

/// State after a successful return.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnSummary {
    pub book: Book,
    pub member: Member,
    pub transaction: Transaction,
    pub late_fee: LateFee,
}
