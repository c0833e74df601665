//! Booking settlement input and its persisted status.

use crate::domain::{Money, Platform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary fields of a booking, as handed over by the booking system.
///
/// Read-only value object; the booking itself is owned externally and
/// referenced through `id` as the correlation key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub platform: Platform,
    pub base_pay: Money,
    pub markup_amount: Money,
    pub commission_amount: Money,
}

impl Booking {
    /// base + markup, the amount the office earns on the booking.
    pub fn office_income(&self) -> Money {
        self.base_pay + self.markup_amount
    }

    /// All monetary fields must be non-negative.
    pub fn amounts_valid(&self) -> bool {
        !self.base_pay.is_negative()
            && !self.markup_amount.is_negative()
            && !self.commission_amount.is_negative()
    }
}

/// Persisted settlement state of a booking.
///
/// `Unapplied → Applied` via apply, `Applied → Unapplied` via
/// refund-on-unconfirm, `Applied → Reversed` via refund-on-delete.
/// Any other transition is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Unapplied,
    Applied,
    Reversed,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Unapplied => "unapplied",
            SettlementStatus::Applied => "applied",
            SettlementStatus::Reversed => "reversed",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "unapplied" => Some(SettlementStatus::Unapplied),
            "applied" => Some(SettlementStatus::Applied),
            "reversed" => Some(SettlementStatus::Reversed),
            _ => None,
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
