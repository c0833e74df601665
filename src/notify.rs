//! User-visible notification seam.
//!
//! Every successful posting and every failure surfaces a notification
//! to the invoking collaborator. This is a collaborator-facing effect,
//! not part of the ledger's correctness contract.

use crate::domain::{Money, WalletKey};
use async_trait::async_trait;
use std::fmt;

#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    /// A posting was committed: signed amount against a wallet key.
    async fn posted(&self, key: WalletKey, amount: Money, description: &str);

    /// An operation failed with a human-readable reason.
    async fn failed(&self, reason: &str);
}

/// Default notifier: structured log events.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn posted(&self, key: WalletKey, amount: Money, description: &str) {
        if amount.is_negative() {
            tracing::info!(
                wallet = %key,
                amount = %amount.abs().to_display_string(),
                description,
                "debited"
            );
        } else {
            tracing::info!(
                wallet = %key,
                amount = %amount.to_display_string(),
                description,
                "credited"
            );
        }
    }

    async fn failed(&self, reason: &str) {
        tracing::warn!(reason, "wallet operation failed");
    }
}
