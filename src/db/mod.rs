//! Ledger store: SQLite persistence for wallets and postings.

pub mod migrations;
pub mod store;

pub use migrations::init_db;
pub use store::{Correlation, LedgerStore, StatusTransition, WalletRecord};
