//! Ledger store: transactional write paths and read queries.
//!
//! All balance changes go through [`LedgerStore::execute_settlement`],
//! which runs the whole posting plan of one settlement in a single
//! transaction. The sufficiency check for a debit happens here, against
//! the balance read inside that transaction, never against a cached
//! snapshot. Writers are additionally serialized through a process-wide
//! gate so two settlements can never interleave on the same wallets.

use crate::domain::{EntryTag, Money, Posting, SettlementStatus, WalletKey};
use crate::engine::planner::PlannedLeg;
use crate::error::LedgerError;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// A wallet row as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletRecord {
    pub id: String,
    pub name: String,
    pub balance: Money,
    pub created_at: i64,
}

/// Correlation keys linking a settlement's postings to their event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correlation {
    pub booking_id: Option<String>,
    pub expense_id: Option<String>,
}

impl Correlation {
    pub fn none() -> Self {
        Correlation::default()
    }

    pub fn booking(id: &str) -> Self {
        Correlation {
            booking_id: Some(id.to_string()),
            expense_id: None,
        }
    }

    pub fn expense(id: &str) -> Self {
        Correlation {
            booking_id: None,
            expense_id: Some(id.to_string()),
        }
    }
}

/// Check-and-set guard over a booking's settlement status, executed in
/// the same transaction as the postings it protects.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub booking_id: String,
    pub from: SettlementStatus,
    pub to: SettlementStatus,
}

pub struct LedgerStore {
    pool: SqlitePool,
    // Per-store serialized-write discipline: one settlement commits at
    // a time, so balance reads inside a write transaction stay stable.
    write_gate: Mutex<()>,
}

impl LedgerStore {
    pub fn new(pool: SqlitePool) -> Self {
        LedgerStore {
            pool,
            write_gate: Mutex::new(()),
        }
    }

    /// Fetch all wallets in stable enumeration order (created_at ASC).
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored balance does not
    /// parse.
    pub async fn fetch_wallets(&self) -> Result<Vec<WalletRecord>, LedgerError> {
        let rows = sqlx::query(
            "SELECT id, name, balance, created_at FROM wallets ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let balance_str: String = row.get("balance");
                let balance = Money::parse(&balance_str).map_err(|_| {
                    LedgerError::Corrupt(format!("unparseable wallet balance: {}", balance_str))
                })?;
                Ok(WalletRecord {
                    id: row.get("id"),
                    name: row.get("name"),
                    balance,
                    created_at: row.get("created_at"),
                })
            })
            .collect()
    }

    /// Create a wallet if it does not exist. Provisioning is an
    /// out-of-band concern; settlements never call this.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn provision_wallet(&self, name: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO wallets (id, name, balance, created_at) VALUES (?, ?, '0', ?) \
             ON CONFLICT(name) DO NOTHING",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(name)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Execute one settlement: optional status check-and-set, then every
    /// planned leg in order, all in a single transaction.
    ///
    /// Any failure rolls the whole settlement back; the caller sees
    /// either full effect or none. Zero-amount legs write nothing.
    /// Returns the refreshed balance of every touched wallet.
    ///
    /// # Errors
    /// `WalletNotFound` when a leg's key does not resolve,
    /// `InsufficientBalance` when a debit would take a wallet below
    /// zero, `SettlementConflict` on an illegal status transition,
    /// `Store` on transport or backend failure.
    pub async fn execute_settlement(
        &self,
        actor: &str,
        legs: &[PlannedLeg],
        correlation: &Correlation,
        transition: Option<&StatusTransition>,
    ) -> Result<BTreeMap<WalletKey, Money>, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;
        let now = chrono::Utc::now().timestamp_millis();

        if let Some(t) = transition {
            // Absent row counts as unapplied.
            sqlx::query(
                "INSERT INTO booking_settlements (booking_id, status, updated_at) \
                 VALUES (?, 'unapplied', ?) ON CONFLICT(booking_id) DO NOTHING",
            )
            .bind(&t.booking_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            let result = sqlx::query(
                "UPDATE booking_settlements SET status = ?, updated_at = ? \
                 WHERE booking_id = ? AND status = ?",
            )
            .bind(t.to.as_str())
            .bind(now)
            .bind(&t.booking_id)
            .bind(t.from.as_str())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let row = sqlx::query("SELECT status FROM booking_settlements WHERE booking_id = ?")
                    .bind(&t.booking_id)
                    .fetch_one(&mut *tx)
                    .await?;
                let status_str: String = row.get("status");
                let status = SettlementStatus::from_str_opt(&status_str)
                    .ok_or_else(|| LedgerError::Corrupt(format!("bad status: {}", status_str)))?;
                return Err(LedgerError::SettlementConflict {
                    booking_id: t.booking_id.clone(),
                    status,
                });
            }
        }

        let mut touched = BTreeMap::new();
        for leg in legs {
            if leg.amount.is_zero() {
                continue;
            }

            let row = sqlx::query("SELECT id, balance FROM wallets WHERE name = ?")
                .bind(leg.key.store_name())
                .fetch_optional(&mut *tx)
                .await?;
            let Some(row) = row else {
                return Err(LedgerError::WalletNotFound(leg.key));
            };
            let wallet_id: String = row.get("id");
            let balance_str: String = row.get("balance");
            let balance = Money::parse(&balance_str).map_err(|_| {
                LedgerError::Corrupt(format!("unparseable wallet balance: {}", balance_str))
            })?;

            let new_balance = balance + leg.amount;
            if leg.amount.is_negative() && new_balance.is_negative() {
                return Err(LedgerError::InsufficientBalance {
                    key: leg.key,
                    available: balance,
                    requested: leg.amount.abs(),
                });
            }

            // Conditional write: reject if the balance moved since we
            // read it. Cannot fire under the write gate, but the store
            // boundary stays safe even if the gate is ever relaxed.
            let result = sqlx::query("UPDATE wallets SET balance = ? WHERE id = ? AND balance = ?")
                .bind(new_balance.to_canonical_string())
                .bind(&wallet_id)
                .bind(&balance_str)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(LedgerError::WriteConflict(leg.key));
            }

            sqlx::query(
                "INSERT INTO wallet_transactions \
                 (wallet_id, amount, created_at, created_by, description, booking_id, expense_id, entry_tag) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&wallet_id)
            .bind(leg.amount.to_canonical_string())
            .bind(now)
            .bind(actor)
            .bind(&leg.description)
            .bind(correlation.booking_id.as_deref())
            .bind(correlation.expense_id.as_deref())
            .bind(leg.tag.map(|t| t.as_str()))
            .execute(&mut *tx)
            .await?;

            touched.insert(leg.key, new_balance);
        }

        tx.commit().await?;
        Ok(touched)
    }

    /// Current settlement status of a booking; absent rows are
    /// unapplied.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn settlement_status(
        &self,
        booking_id: &str,
    ) -> Result<SettlementStatus, LedgerError> {
        let row = sqlx::query("SELECT status FROM booking_settlements WHERE booking_id = ?")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            None => Ok(SettlementStatus::Unapplied),
            Some(row) => {
                let status_str: String = row.get("status");
                SettlementStatus::from_str_opt(&status_str)
                    .ok_or_else(|| LedgerError::Corrupt(format!("bad status: {}", status_str)))
            }
        }
    }

    /// Most recent postings, newest first, capped at `limit`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_recent_postings(&self, limit: i64) -> Result<Vec<Posting>, LedgerError> {
        let rows = sqlx::query(
            "SELECT id, wallet_id, amount, created_at, created_by, description, \
                    booking_id, expense_id, entry_tag \
             FROM wallet_transactions ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let amount_str: String = row.get("amount");
                let amount = Money::parse(&amount_str).map_err(|_| {
                    LedgerError::Corrupt(format!("unparseable posting amount: {}", amount_str))
                })?;
                let tag: Option<String> = row.get("entry_tag");
                Ok(Posting {
                    id: row.get("id"),
                    wallet_id: row.get("wallet_id"),
                    amount,
                    created_at: row.get("created_at"),
                    created_by: row.get("created_by"),
                    description: row.get("description"),
                    booking_id: row.get("booking_id"),
                    expense_id: row.get("expense_id"),
                    tag: tag.as_deref().and_then(EntryTag::from_str_opt),
                })
            })
            .collect()
    }

    /// Derive a wallet's balance by replaying its posting log. The
    /// cached balance must always equal this sum.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn replay_balance(&self, wallet_id: &str) -> Result<Money, LedgerError> {
        let rows = sqlx::query("SELECT amount FROM wallet_transactions WHERE wallet_id = ?")
            .bind(wallet_id)
            .fetch_all(&self.pool)
            .await?;

        let mut total = Money::zero();
        for row in rows {
            let amount_str: String = row.get("amount");
            let amount = Money::parse(&amount_str).map_err(|_| {
                LedgerError::Corrupt(format!("unparseable posting amount: {}", amount_str))
            })?;
            total = total + amount;
        }
        Ok(total)
    }
}
