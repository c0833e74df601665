use crate::domain::{Money, SettlementStatus, WalletKey};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Typed failures of the ledger core.
///
/// Validation errors are detected before any write; store and conflict
/// errors roll the enclosing settlement transaction back, so a failed
/// operation never leaves partial postings behind.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,
    #[error("Invalid expense: amount must be greater than zero")]
    InvalidExpense,
    #[error("Wallet not found for key: {0}")]
    WalletNotFound(WalletKey),
    #[error("Insufficient balance in {key}. Available: {}", available.to_display_string())]
    InsufficientBalance {
        key: WalletKey,
        available: Money,
        requested: Money,
    },
    #[error("Booking {booking_id} is {status}; settlement rejected")]
    SettlementConflict {
        booking_id: String,
        status: SettlementStatus,
    },
    #[error("Wallet {0} changed concurrently; settlement aborted")]
    WriteConflict(WalletKey),
    #[error("Corrupt ledger data: {0}")]
    Corrupt(String),
    #[error("Ledger store error: {0}")]
    Store(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount | LedgerError::InvalidExpense => {
                AppError::BadRequest(err.to_string())
            }
            LedgerError::WalletNotFound(_) => AppError::NotFound(err.to_string()),
            LedgerError::InsufficientBalance { .. }
            | LedgerError::SettlementConflict { .. }
            | LedgerError::WriteConflict(_) => AppError::Conflict(err.to_string()),
            LedgerError::Corrupt(_) | LedgerError::Store(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
