//! Wallet index: logical key → (wallet id, name, last-known balance).
//!
//! The snapshot is a best-effort read cache rebuilt wholesale on every
//! reload; the store remains the source of truth and all sufficiency
//! checks happen there. Reads of an unmapped key return zero, which
//! covers the window before provisioning completes.

use crate::db::LedgerStore;
use crate::domain::{Money, WalletKey};
use crate::error::LedgerError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One wallet as last loaded from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletEntry {
    pub id: String,
    pub name: String,
    pub balance: Money,
}

/// Immutable view of all mapped wallets, replaced wholesale on reload.
#[derive(Debug, Default)]
pub struct WalletSnapshot {
    by_key: HashMap<WalletKey, WalletEntry>,
}

impl WalletSnapshot {
    /// Last-loaded balance, or zero if the key is unmapped.
    pub fn balance_of(&self, key: WalletKey) -> Money {
        self.by_key
            .get(&key)
            .map(|e| e.balance)
            .unwrap_or_else(Money::zero)
    }

    pub fn entry(&self, key: WalletKey) -> Option<&WalletEntry> {
        self.by_key.get(&key)
    }

    /// Map a store wallet id back to its logical key.
    pub fn key_for_wallet_id(&self, wallet_id: &str) -> Option<WalletKey> {
        self.by_key
            .iter()
            .find(|(_, e)| e.id == wallet_id)
            .map(|(k, _)| *k)
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

pub struct WalletIndex {
    store: Arc<LedgerStore>,
    snapshot: RwLock<Arc<WalletSnapshot>>,
}

impl WalletIndex {
    pub fn new(store: Arc<LedgerStore>) -> Self {
        WalletIndex {
            store,
            snapshot: RwLock::new(Arc::new(WalletSnapshot::default())),
        }
    }

    /// Rebuild the snapshot from the store. On failure the previous
    /// snapshot is retained and the error is surfaced.
    ///
    /// # Errors
    /// Returns an error if the wallet query fails.
    pub async fn reload(&self) -> Result<(), LedgerError> {
        let wallets = self.store.fetch_wallets().await?;

        let mut by_key = HashMap::new();
        for record in wallets {
            // Wallets with names outside the fixed set are ignored.
            if let Some(key) = WalletKey::from_store_name(&record.name) {
                by_key.insert(
                    key,
                    WalletEntry {
                        id: record.id,
                        name: record.name,
                        balance: record.balance,
                    },
                );
            }
        }

        let mut guard = self.snapshot.write().await;
        *guard = Arc::new(WalletSnapshot { by_key });
        Ok(())
    }

    /// Current snapshot; callers hold it without blocking reloads.
    pub async fn snapshot(&self) -> Arc<WalletSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Last-loaded balance for a key, zero if unmapped.
    pub async fn balance_of(&self, key: WalletKey) -> Money {
        self.snapshot.read().await.balance_of(key)
    }
}
