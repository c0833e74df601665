use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::AppState;
use crate::domain::{Expense, WalletKey};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    #[serde(flatten)]
    pub expense: Expense,
    #[serde(default)]
    pub actor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub expense_id: String,
    pub postings: usize,
    pub balances: BTreeMap<WalletKey, String>,
}

pub async fn debit_for_expense(
    State(state): State<AppState>,
    Json(req): Json<ExpenseRequest>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let actor = req.actor.as_deref().unwrap_or("Expense Logger");
    let outcome = state.engine.debit_for_expense(&req.expense, actor).await?;
    Ok(Json(ExpenseResponse {
        expense_id: req.expense.id.clone(),
        postings: outcome.postings,
        balances: outcome
            .balances
            .into_iter()
            .map(|(k, v)| (k, v.to_canonical_string()))
            .collect(),
    }))
}

pub async fn refund_expense_on_delete(
    State(state): State<AppState>,
    Json(req): Json<ExpenseRequest>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let actor = req.actor.as_deref().unwrap_or("Expense Deleted");
    let outcome = state
        .engine
        .refund_expense_on_delete(&req.expense, actor)
        .await?;
    Ok(Json(ExpenseResponse {
        expense_id: req.expense.id.clone(),
        postings: outcome.postings,
        balances: outcome
            .balances
            .into_iter()
            .map(|(k, v)| (k, v.to_canonical_string()))
            .collect(),
    }))
}
