use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    pub limit: Option<i64>,
}

/// One posting in the activity view: the wallet id is mapped back to
/// its logical key and the signed amount split into operation plus
/// absolute amount.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_key: Option<String>,
    pub operation: String,
    pub amount: String,
    pub actor: String,
    pub timestamp: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionDto>,
}

pub async fn list_recent(
    Query(params): Query<TransactionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let limit = match params.limit {
        Some(l) if l <= 0 => {
            return Err(AppError::BadRequest("limit must be positive".to_string()))
        }
        Some(l) => l.min(state.config.history_limit),
        None => state.config.history_limit,
    };

    let postings = state.store.list_recent_postings(limit).await?;
    let snapshot = state.index.snapshot().await;

    let transactions = postings
        .into_iter()
        .map(|p| TransactionDto {
            id: p.id,
            wallet_key: snapshot
                .key_for_wallet_id(&p.wallet_id)
                .map(|k| k.to_string()),
            operation: p.operation().to_string(),
            amount: p.amount.abs().to_canonical_string(),
            actor: p.created_by,
            timestamp: p.created_at,
            description: p.description,
            booking_id: p.booking_id,
            expense_id: p.expense_id,
            tag: p.tag.map(|t| t.as_str().to_string()),
        })
        .collect();

    Ok(Json(TransactionsResponse { transactions }))
}
