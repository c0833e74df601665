//! Expense settlement input.

use crate::domain::Money;
use serde::{Deserialize, Serialize};

/// An office expense, as handed over by the expense tracker.
///
/// Settles as a single debit against the office wallet; deleting the
/// expense refunds the same amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub amount: Money,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Expense {
    /// Expense amounts must be strictly positive.
    pub fn amount_valid(&self) -> bool {
        self.amount.is_positive()
    }
}
