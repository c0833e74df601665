pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod index;
pub mod notify;
pub mod recorder;

pub use config::Config;
pub use db::{init_db, Correlation, LedgerStore, StatusTransition};
pub use domain::{
    Booking, EntryTag, Expense, Money, Platform, Posting, SettlementStatus, WalletKey,
};
pub use engine::{SettlementEngine, SettlementOutcome};
pub use error::{AppError, LedgerError};
pub use index::WalletIndex;
pub use notify::{LogNotifier, Notifier};
pub use recorder::TransactionRecorder;
