use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::AppState;
use crate::domain::{Booking, SettlementStatus, WalletKey};
use crate::engine::SettlementOutcome;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(default)]
    pub actor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub booking_id: String,
    pub status: SettlementStatus,
    pub postings: usize,
    /// Refreshed balances of every touched wallet, canonical strings.
    pub balances: BTreeMap<WalletKey, String>,
}

fn response(
    booking_id: &str,
    status: SettlementStatus,
    outcome: SettlementOutcome,
) -> SettlementResponse {
    SettlementResponse {
        booking_id: booking_id.to_string(),
        status,
        postings: outcome.postings,
        balances: outcome
            .balances
            .into_iter()
            .map(|(k, v)| (k, v.to_canonical_string()))
            .collect(),
    }
}

pub async fn apply_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<SettlementResponse>, AppError> {
    let actor = req.actor.as_deref().unwrap_or("Confirm Booking");
    let outcome = state.engine.apply_booking(&req.booking, actor).await?;
    Ok(Json(response(
        &req.booking.id,
        SettlementStatus::Applied,
        outcome,
    )))
}

pub async fn refund_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<SettlementResponse>, AppError> {
    let actor = req.actor.as_deref().unwrap_or("Unconfirm");
    let outcome = state.engine.refund_booking(&req.booking, actor).await?;
    Ok(Json(response(
        &req.booking.id,
        SettlementStatus::Unapplied,
        outcome,
    )))
}

pub async fn refund_booking_on_delete(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<SettlementResponse>, AppError> {
    let actor = req.actor.as_deref().unwrap_or("Delete Booking");
    let outcome = state
        .engine
        .refund_booking_on_delete(&req.booking, actor)
        .await?;
    Ok(Json(response(
        &req.booking.id,
        SettlementStatus::Reversed,
        outcome,
    )))
}
