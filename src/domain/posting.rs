//! Immutable ledger posting.

use crate::domain::{EntryTag, Money};
use serde::{Deserialize, Serialize};

/// One signed ledger entry against a wallet.
///
/// Never updated or deleted once written; corrections are new
/// compensating postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Store-assigned row id.
    pub id: i64,
    /// Owning wallet id.
    pub wallet_id: String,
    /// Signed amount: positive credit, negative debit.
    pub amount: Money,
    /// Creation time in milliseconds since Unix epoch.
    pub created_at: i64,
    /// Actor identity for audit attribution.
    pub created_by: String,
    pub description: String,
    /// Correlation key linking this posting to a booking settlement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Correlation key linking this posting to an expense event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<String>,
    /// Settlement leg that produced this posting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<EntryTag>,
}

impl Posting {
    /// "credit" or "debit", derived from the amount's sign. Zero never
    /// reaches the ledger, so it is not a case here.
    pub fn operation(&self) -> &'static str {
        if self.amount.is_negative() {
            "debit"
        } else {
            "credit"
        }
    }
}
