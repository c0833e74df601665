//! Booking and expense settlement: plans executed atomically against
//! the store, with status check-and-set for booking lifecycles.

use crate::db::{Correlation, LedgerStore, StatusTransition};
use crate::domain::{Booking, Expense, Money, SettlementStatus, WalletKey};
use crate::engine::planner::{
    apply_plan, expense_debit_plan, expense_refund_plan, reversal_plan, PlannedLeg, ReversalCause,
};
use crate::error::LedgerError;
use crate::index::WalletIndex;
use crate::notify::Notifier;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of one settlement: how many postings landed and the refreshed
/// balance of every touched wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementOutcome {
    pub postings: usize,
    pub balances: BTreeMap<WalletKey, Money>,
}

pub struct SettlementEngine {
    store: Arc<LedgerStore>,
    index: Arc<WalletIndex>,
    notifier: Arc<dyn Notifier>,
}

impl SettlementEngine {
    pub fn new(
        store: Arc<LedgerStore>,
        index: Arc<WalletIndex>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            index,
            notifier,
        }
    }

    /// Settle a confirmed booking (Unapplied → Applied).
    ///
    /// # Errors
    /// `InvalidAmount` on negative monetary fields,
    /// `SettlementConflict` when the booking is already applied or
    /// reversed, otherwise the store's failure modes. Fully applies or
    /// has no effect.
    pub async fn apply_booking(
        &self,
        booking: &Booking,
        actor: &str,
    ) -> Result<SettlementOutcome, LedgerError> {
        self.validate_booking(booking).await?;
        let transition = StatusTransition {
            booking_id: booking.id.clone(),
            from: SettlementStatus::Unapplied,
            to: SettlementStatus::Applied,
        };
        tracing::info!(booking_id = %booking.id, platform = %booking.platform, "applying booking settlement");
        self.settle(
            apply_plan(booking),
            Correlation::booking(&booking.id),
            Some(transition),
            actor,
        )
        .await
    }

    /// Reverse a settlement when a booking is un-confirmed
    /// (Applied → Unapplied). Posting-for-posting inverse of apply.
    ///
    /// # Errors
    /// As [`apply_booking`](Self::apply_booking); `SettlementConflict`
    /// when the booking is not currently applied.
    pub async fn refund_booking(
        &self,
        booking: &Booking,
        actor: &str,
    ) -> Result<SettlementOutcome, LedgerError> {
        self.validate_booking(booking).await?;
        let transition = StatusTransition {
            booking_id: booking.id.clone(),
            from: SettlementStatus::Applied,
            to: SettlementStatus::Unapplied,
        };
        tracing::info!(booking_id = %booking.id, "refunding booking on unconfirm");
        self.settle(
            reversal_plan(booking, ReversalCause::Unconfirm),
            Correlation::booking(&booking.id),
            Some(transition),
            actor,
        )
        .await
    }

    /// Reverse a settlement when a booking is deleted
    /// (Applied → Reversed). Same postings as the unconfirm path; the
    /// terminal status differs.
    ///
    /// # Errors
    /// As [`refund_booking`](Self::refund_booking).
    pub async fn refund_booking_on_delete(
        &self,
        booking: &Booking,
        actor: &str,
    ) -> Result<SettlementOutcome, LedgerError> {
        self.validate_booking(booking).await?;
        let transition = StatusTransition {
            booking_id: booking.id.clone(),
            from: SettlementStatus::Applied,
            to: SettlementStatus::Reversed,
        };
        tracing::info!(booking_id = %booking.id, "refunding booking on delete");
        self.settle(
            reversal_plan(booking, ReversalCause::Delete),
            Correlation::booking(&booking.id),
            Some(transition),
            actor,
        )
        .await
    }

    /// Debit the office wallet for a logged expense.
    ///
    /// # Errors
    /// `InvalidExpense` when the amount is not strictly positive,
    /// otherwise the store's failure modes.
    pub async fn debit_for_expense(
        &self,
        expense: &Expense,
        actor: &str,
    ) -> Result<SettlementOutcome, LedgerError> {
        self.validate_expense(expense).await?;
        self.settle(
            expense_debit_plan(expense),
            Correlation::expense(&expense.id),
            None,
            actor,
        )
        .await
    }

    /// Refund the office wallet when an expense is deleted. Validation
    /// matches [`debit_for_expense`](Self::debit_for_expense): both
    /// paths reject a non-positive amount with `InvalidExpense`.
    ///
    /// # Errors
    /// As [`debit_for_expense`](Self::debit_for_expense).
    pub async fn refund_expense_on_delete(
        &self,
        expense: &Expense,
        actor: &str,
    ) -> Result<SettlementOutcome, LedgerError> {
        self.validate_expense(expense).await?;
        self.settle(
            expense_refund_plan(expense),
            Correlation::expense(&expense.id),
            None,
            actor,
        )
        .await
    }

    /// Current settlement status of a booking id.
    ///
    /// # Errors
    /// Returns an error if the store read fails.
    pub async fn settlement_status(
        &self,
        booking_id: &str,
    ) -> Result<SettlementStatus, LedgerError> {
        self.store.settlement_status(booking_id).await
    }

    async fn validate_booking(&self, booking: &Booking) -> Result<(), LedgerError> {
        if !booking.amounts_valid() {
            self.notifier
                .failed("Invalid amount: must be greater than zero")
                .await;
            return Err(LedgerError::InvalidAmount);
        }
        Ok(())
    }

    async fn validate_expense(&self, expense: &Expense) -> Result<(), LedgerError> {
        if !expense.amount_valid() {
            self.notifier
                .failed("Invalid expense: amount must be greater than zero")
                .await;
            return Err(LedgerError::InvalidExpense);
        }
        Ok(())
    }

    async fn settle(
        &self,
        legs: Vec<PlannedLeg>,
        correlation: Correlation,
        transition: Option<StatusTransition>,
        actor: &str,
    ) -> Result<SettlementOutcome, LedgerError> {
        match self
            .store
            .execute_settlement(actor, &legs, &correlation, transition.as_ref())
            .await
        {
            Ok(balances) => {
                if let Err(e) = self.index.reload().await {
                    tracing::warn!(error = %e, "wallet index reload failed after settlement");
                }
                for leg in &legs {
                    if !leg.amount.is_zero() {
                        self.notifier
                            .posted(leg.key, leg.amount, &leg.description)
                            .await;
                    }
                }
                Ok(SettlementOutcome {
                    postings: legs.iter().filter(|l| !l.amount.is_zero()).count(),
                    balances,
                })
            }
            Err(e) => {
                self.notifier.failed(&e.to_string()).await;
                Err(e)
            }
        }
    }
}
