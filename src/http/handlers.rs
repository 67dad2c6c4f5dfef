//! Request handlers.
//!
//! Handlers are thin: deserialize, call into the chain layer, project
//! the result. All failure classification lives in the chain layer and
//! all HTTP mapping in [`crate::http::response`].

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::chain::status::ReceiptView;
use crate::chain::types::SubmitRequest;
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Response body for a confirmed submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    /// Canonical hex form of the broadcast identifier.
    pub tx_hash: String,
    /// Settlement status code: 1 success, 0 failure.
    pub status: u64,
    pub gas_used: u64,
    pub block_number: u64,
    /// Echo of the submitted payload for caller confirmation.
    pub logged_data: Option<String>,
}

/// Response body for the liveness probe.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub connected: bool,
}

/// POST /transactions — build, sign, broadcast, await finalization.
pub async fn submit_transaction(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let (tx, wallet) = state.builder.build(&request).await?;
    let outcome = state
        .pipeline
        .submit(tx, &wallet, request.data.clone())
        .await?;

    Ok(Json(SubmitResponse {
        message: "transaction confirmed on chain",
        tx_hash: format!("{:#x}", outcome.tx_hash),
        status: outcome.status,
        gas_used: outcome.gas_used,
        block_number: outcome.block_number,
        logged_data: outcome.echoed_data,
    }))
}

/// GET /transactions/{tx_hash} — settlement status projection.
pub async fn transaction_status(
    State(state): State<AppState>,
    Path(tx_hash): Path<String>,
) -> Result<Json<ReceiptView>, ApiError> {
    let view = state.status.status(&tx_hash).await?;
    Ok(Json(view))
}

/// GET /health — connectivity flag, no transformation.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        connected: state.ledger.is_connected().await,
    })
}
