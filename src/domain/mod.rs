//! Core domain types for the wallet ledger.

pub mod booking;
pub mod expense;
pub mod money;
pub mod posting;
pub mod primitives;

pub use booking::{Booking, SettlementStatus};
pub use expense::Expense;
pub use money::Money;
pub use posting::Posting;
pub use primitives::{EntryTag, Platform, WalletKey};
