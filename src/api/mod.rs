pub mod bookings;
pub mod expenses;
pub mod health;
pub mod transactions;
pub mod wallets;

use crate::config::Config;
use crate::db::LedgerStore;
use crate::engine::SettlementEngine;
use crate::index::WalletIndex;
use crate::recorder::TransactionRecorder;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LedgerStore>,
    pub index: Arc<WalletIndex>,
    pub engine: Arc<SettlementEngine>,
    pub recorder: Arc<TransactionRecorder>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: Arc<LedgerStore>,
        index: Arc<WalletIndex>,
        engine: Arc<SettlementEngine>,
        recorder: Arc<TransactionRecorder>,
        config: Config,
    ) -> Self {
        Self {
            store,
            index,
            engine,
            recorder,
            config,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/wallets", get(wallets::list_wallets))
        .route("/v1/wallets/balance", get(wallets::get_balance))
        .route("/v1/wallets/credit", post(wallets::credit_wallet))
        .route("/v1/wallets/debit", post(wallets::debit_wallet))
        .route("/v1/transactions", get(transactions::list_recent))
        .route("/v1/bookings/apply", post(bookings::apply_booking))
        .route("/v1/bookings/refund", post(bookings::refund_booking))
        .route(
            "/v1/bookings/refund-on-delete",
            post(bookings::refund_booking_on_delete),
        )
        .route("/v1/expenses/debit", post(expenses::debit_for_expense))
        .route(
            "/v1/expenses/refund-on-delete",
            post(expenses::refund_expense_on_delete),
        )
        .layer(cors)
        .with_state(state)
}
