//! Transaction recorder: append one posting, refresh the index, notify.

use crate::db::{Correlation, LedgerStore};
use crate::domain::{EntryTag, Money, WalletKey};
use crate::engine::planner::PlannedLeg;
use crate::error::LedgerError;
use crate::index::WalletIndex;
use crate::notify::Notifier;
use std::sync::Arc;

/// Metadata attached to a single posting.
#[derive(Debug, Clone, Default)]
pub struct PostingMeta {
    pub description: Option<String>,
    pub tag: Option<EntryTag>,
    pub correlation: Correlation,
}

pub struct TransactionRecorder {
    store: Arc<LedgerStore>,
    index: Arc<WalletIndex>,
    notifier: Arc<dyn Notifier>,
}

impl TransactionRecorder {
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

    /// Append one signed posting. Zero amounts are a no-op and return
    /// `None`; on success the wallet index is refreshed and the new
    /// balance returned.
    ///
    /// # Errors
    /// `WalletNotFound` when the key does not resolve in the store,
    /// `InsufficientBalance` when a debit would overdraw, `Store` on
    /// backend failure. No partial effect in any error case.
    pub async fn post(
        &self,
        key: WalletKey,
        amount: Money,
        meta: PostingMeta,
        actor: &str,
    ) -> Result<Option<Money>, LedgerError> {
        if amount.is_zero() {
            return Ok(None);
        }

        let description = meta
            .description
            .unwrap_or_else(|| "Wallet transaction".to_string());
        let leg = PlannedLeg {
            key,
            amount,
            tag: meta.tag,
            description: description.clone(),
        };

        match self
            .store
            .execute_settlement(actor, &[leg], &meta.correlation, None)
            .await
        {
            Ok(touched) => {
                self.refresh_index().await;
                self.notifier.posted(key, amount, &description).await;
                Ok(touched.get(&key).copied())
            }
            Err(e) => {
                self.notifier.failed(&e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Credit a wallet. Amount must be > 0.
    ///
    /// # Errors
    /// `InvalidAmount` on zero or negative input, otherwise as [`post`].
    ///
    /// [`post`]: TransactionRecorder::post
    pub async fn credit(
        &self,
        key: WalletKey,
        amount: Money,
        description: Option<String>,
        actor: &str,
    ) -> Result<Money, LedgerError> {
        if !amount.is_positive() {
            self.notifier
                .failed("Invalid amount: must be greater than zero")
                .await;
            return Err(LedgerError::InvalidAmount);
        }
        let meta = PostingMeta {
            description,
            tag: Some(EntryTag::ManualCredit),
            correlation: Correlation::none(),
        };
        let balance = self.post(key, amount, meta, actor).await?;
        balance.ok_or_else(|| LedgerError::Corrupt("posting wrote no balance".to_string()))
    }

    /// Debit a wallet. Amount must be > 0 and within the current
    /// balance; the sufficiency check happens at the store boundary.
    ///
    /// # Errors
    /// `InvalidAmount` on zero or negative input, otherwise as [`post`].
    ///
    /// [`post`]: TransactionRecorder::post
    pub async fn debit(
        &self,
        key: WalletKey,
        amount: Money,
        description: Option<String>,
        actor: &str,
    ) -> Result<Money, LedgerError> {
        if !amount.is_positive() {
            self.notifier
                .failed("Invalid amount: must be greater than zero")
                .await;
            return Err(LedgerError::InvalidAmount);
        }
        let meta = PostingMeta {
            description,
            tag: Some(EntryTag::ManualDebit),
            correlation: Correlation::none(),
        };
        let balance = self.post(key, -amount, meta, actor).await?;
        balance.ok_or_else(|| LedgerError::Corrupt("posting wrote no balance".to_string()))
    }

    /// Index refresh after a committed posting. The posting is durable
    /// either way; a failed refresh only leaves the cache stale.
    async fn refresh_index(&self) {
        if let Err(e) = self.index.reload().await {
            tracing::warn!(error = %e, "wallet index reload failed after posting");
        }
    }
}
