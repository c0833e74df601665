//! Domain primitives: WalletKey, Platform, EntryTag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical key for one of the fixed operating wallets.
///
/// Wallets are provisioned out-of-band; the ledger core only resolves
/// keys against the store and posts to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKey {
    /// AlHind consolidator float.
    Alhind,
    /// Akbar consolidator float.
    Akbar,
    /// Office funds (income and expenses).
    Office,
}

impl WalletKey {
    /// Canonical wallet name in the store.
    pub fn store_name(&self) -> &'static str {
        match self {
            WalletKey::Alhind => "AlHind",
            WalletKey::Akbar => "Akbar",
            WalletKey::Office => "Office-Funds",
        }
    }

    /// Resolve a store wallet name back to its logical key.
    pub fn from_store_name(name: &str) -> Option<Self> {
        match name {
            "AlHind" => Some(WalletKey::Alhind),
            "Akbar" => Some(WalletKey::Akbar),
            "Office-Funds" => Some(WalletKey::Office),
            _ => None,
        }
    }

    pub fn all() -> [WalletKey; 3] {
        [WalletKey::Alhind, WalletKey::Akbar, WalletKey::Office]
    }
}

impl fmt::Display for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletKey::Alhind => write!(f, "alhind"),
            WalletKey::Akbar => write!(f, "akbar"),
            WalletKey::Office => write!(f, "office"),
        }
    }
}

impl FromStr for WalletKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alhind" => Ok(WalletKey::Alhind),
            "akbar" => Ok(WalletKey::Akbar),
            "office" => Ok(WalletKey::Office),
            other => Err(format!("unknown wallet key: {}", other)),
        }
    }
}

/// Originating platform of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Alhind,
    Akbar,
    /// Booked directly with the office; no consolidator wallet involved.
    Direct,
}

impl Platform {
    /// The consolidator wallet this platform settles against, if any.
    pub fn wallet_key(&self) -> Option<WalletKey> {
        match self {
            Platform::Alhind => Some(WalletKey::Alhind),
            Platform::Akbar => Some(WalletKey::Akbar),
            Platform::Direct => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Alhind => write!(f, "alhind"),
            Platform::Akbar => write!(f, "akbar"),
            Platform::Direct => write!(f, "direct"),
        }
    }
}

/// Sub-type tag recorded on a posting, linking it to the settlement leg
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryTag {
    BasePay,
    Commission,
    OfficeIncome,
    BaseRefund,
    CommissionRefund,
    OfficeRefund,
    ExpenseDebit,
    ExpenseRefundOnDelete,
    ManualCredit,
    ManualDebit,
}

impl EntryTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryTag::BasePay => "base_pay",
            EntryTag::Commission => "commission",
            EntryTag::OfficeIncome => "office_income",
            EntryTag::BaseRefund => "base_refund",
            EntryTag::CommissionRefund => "commission_refund",
            EntryTag::OfficeRefund => "office_refund",
            EntryTag::ExpenseDebit => "expense_debit",
            EntryTag::ExpenseRefundOnDelete => "expense_refund_on_delete",
            EntryTag::ManualCredit => "manual_credit",
            EntryTag::ManualDebit => "manual_debit",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "base_pay" => Some(EntryTag::BasePay),
            "commission" => Some(EntryTag::Commission),
            "office_income" => Some(EntryTag::OfficeIncome),
            "base_refund" => Some(EntryTag::BaseRefund),
            "commission_refund" => Some(EntryTag::CommissionRefund),
            "office_refund" => Some(EntryTag::OfficeRefund),
            "expense_debit" => Some(EntryTag::ExpenseDebit),
            "expense_refund_on_delete" => Some(EntryTag::ExpenseRefundOnDelete),
            "manual_credit" => Some(EntryTag::ManualCredit),
            "manual_debit" => Some(EntryTag::ManualDebit),
            _ => None,
        }
    }
}

impl fmt::Display for EntryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
