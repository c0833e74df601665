//! Pure settlement planning: booking and expense events in, ordered
//! posting legs out.
//!
//! Plans are deterministic and side-effect free; execution (and the
//! atomicity around it) lives in the ledger store.

use crate::domain::{Booking, EntryTag, Expense, Money, WalletKey};

/// One posting the store should write: wallet, signed amount, leg tag,
/// human-readable description.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLeg {
    pub key: WalletKey,
    pub amount: Money,
    pub tag: Option<EntryTag>,
    pub description: String,
}

impl PlannedLeg {
    fn new(key: WalletKey, amount: Money, tag: EntryTag, description: &str) -> Self {
        PlannedLeg {
            key,
            amount,
            tag: Some(tag),
            description: description.to_string(),
        }
    }
}

/// Which undo path a reversal belongs to. Same postings either way;
/// only the audit descriptions differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReversalCause {
    Unconfirm,
    Delete,
}

/// Postings for confirming a booking, in execution order.
///
/// Platform bookings: debit base pay from the platform wallet, credit
/// commission back to it, credit base + markup to the office. Direct
/// bookings touch only the office. Zero legs are omitted.
pub fn apply_plan(booking: &Booking) -> Vec<PlannedLeg> {
    let office_income = booking.office_income();
    let mut legs = Vec::new();

    let Some(platform_key) = booking.platform.wallet_key() else {
        if office_income.is_positive() {
            legs.push(PlannedLeg::new(
                WalletKey::Office,
                office_income,
                EntryTag::OfficeIncome,
                "Direct: base + markup → Office",
            ));
        }
        return legs;
    };

    if booking.base_pay.is_positive() {
        legs.push(PlannedLeg::new(
            platform_key,
            -booking.base_pay,
            EntryTag::BasePay,
            "Base pay debit",
        ));
    }
    if booking.commission_amount.is_positive() {
        legs.push(PlannedLeg::new(
            platform_key,
            booking.commission_amount,
            EntryTag::Commission,
            "Commission credit",
        ));
    }
    if office_income.is_positive() {
        legs.push(PlannedLeg::new(
            WalletKey::Office,
            office_income,
            EntryTag::OfficeIncome,
            "Office profit: base + markup",
        ));
    }

    legs
}

/// Exact posting-for-posting inverse of [`apply_plan`], in the same
/// relative order: credit what was debited, debit what was credited.
pub fn reversal_plan(booking: &Booking, cause: ReversalCause) -> Vec<PlannedLeg> {
    let office_refund = booking.office_income();
    let office_desc = match cause {
        ReversalCause::Unconfirm => "Refund: base + markup → Office",
        ReversalCause::Delete => "Delete refund: base + markup",
    };
    let mut legs = Vec::new();

    let Some(platform_key) = booking.platform.wallet_key() else {
        if office_refund.is_positive() {
            legs.push(PlannedLeg::new(
                WalletKey::Office,
                -office_refund,
                EntryTag::OfficeRefund,
                office_desc,
            ));
        }
        return legs;
    };

    if booking.base_pay.is_positive() {
        legs.push(PlannedLeg::new(
            platform_key,
            booking.base_pay,
            EntryTag::BaseRefund,
            "Base pay refund",
        ));
    }
    if booking.commission_amount.is_positive() {
        legs.push(PlannedLeg::new(
            platform_key,
            -booking.commission_amount,
            EntryTag::CommissionRefund,
            "Commission refund",
        ));
    }
    if office_refund.is_positive() {
        legs.push(PlannedLeg::new(
            WalletKey::Office,
            -office_refund,
            EntryTag::OfficeRefund,
            office_desc,
        ));
    }

    legs
}

/// Single office debit for a logged expense.
pub fn expense_debit_plan(expense: &Expense) -> Vec<PlannedLeg> {
    vec![PlannedLeg::new(
        WalletKey::Office,
        -expense.amount,
        EntryTag::ExpenseDebit,
        &expense.description,
    )]
}

/// Single office credit refunding a deleted expense.
pub fn expense_refund_plan(expense: &Expense) -> Vec<PlannedLeg> {
    vec![PlannedLeg::new(
        WalletKey::Office,
        expense.amount,
        EntryTag::ExpenseRefundOnDelete,
        &format!("Refund: {}", expense.description),
    )]
}
