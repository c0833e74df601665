use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::AppState;
use crate::domain::{Money, WalletKey};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDto {
    pub key: WalletKey,
    pub name: String,
    pub balance: String,
    /// Two-decimal display form.
    pub formatted: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletsResponse {
    pub wallets: Vec<WalletDto>,
}

pub async fn list_wallets(State(state): State<AppState>) -> Json<WalletsResponse> {
    let snapshot = state.index.snapshot().await;
    let wallets = WalletKey::all()
        .into_iter()
        .map(|key| {
            let balance = snapshot.balance_of(key);
            WalletDto {
                key,
                name: key.store_name().to_string(),
                balance: balance.to_canonical_string(),
                formatted: balance.to_display_string(),
            }
        })
        .collect();
    Json(WalletsResponse { wallets })
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub key: WalletKey,
    pub balance: String,
    pub formatted: String,
}

pub async fn get_balance(
    Query(params): Query<BalanceQuery>,
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, AppError> {
    let key = WalletKey::from_str(&params.key).map_err(AppError::BadRequest)?;
    // Best-effort cache read: unmapped keys report zero.
    let balance = state.index.balance_of(key).await;
    Ok(Json(BalanceResponse {
        key,
        balance: balance.to_canonical_string(),
        formatted: balance.to_display_string(),
    }))
}

fn default_actor() -> String {
    "System".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateWalletRequest {
    pub key: WalletKey,
    pub amount: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_actor")]
    pub actor: String,
}

pub async fn credit_wallet(
    State(state): State<AppState>,
    Json(req): Json<MutateWalletRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state
        .recorder
        .credit(req.key, req.amount, req.description, &req.actor)
        .await?;
    Ok(Json(BalanceResponse {
        key: req.key,
        balance: balance.to_canonical_string(),
        formatted: balance.to_display_string(),
    }))
}

pub async fn debit_wallet(
    State(state): State<AppState>,
    Json(req): Json<MutateWalletRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state
        .recorder
        .debit(req.key, req.amount, req.description, &req.actor)
        .await?;
    Ok(Json(BalanceResponse {
        key: req.key,
        balance: balance.to_canonical_string(),
        formatted: balance.to_display_string(),
    }))
}
