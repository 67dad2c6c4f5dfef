//! Error-to-HTTP mapping.
//!
//! # Responsibilities
//! - Map every [`ChainError`] variant to its own transport status
//! - Keep machine-distinguishable error kinds in the body
//! - Never leak internal diagnostics for contract-violation failures
//!
//! Classification happens in the chain layer; this module only decides
//! how each classified failure crosses the wire. There is deliberately
//! no catch-all arm: adding an error variant forces a mapping decision
//! here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::chain::types::ChainError;

/// Wire shape of a classified failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-distinguishable error kind.
    pub error: &'static str,
    /// Human-readable detail.
    pub detail: String,
}

/// Axum-facing wrapper so handlers can `?` on chain results.
#[derive(Debug)]
pub struct ApiError(pub ChainError);

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, detail) = match &self.0 {
            ChainError::InvalidAddress(_) => {
                (StatusCode::BAD_REQUEST, "invalid_address", self.0.to_string())
            }
            ChainError::InvalidCredential(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_credential",
                self.0.to_string(),
            ),
            ChainError::InvalidAmount(_) => {
                (StatusCode::BAD_REQUEST, "invalid_amount", self.0.to_string())
            }
            ChainError::InvalidTxId(_) => {
                (StatusCode::BAD_REQUEST, "invalid_tx_id", self.0.to_string())
            }
            // Remote rejection of estimation is attributable to the
            // request (e.g. insufficient funds for worst-case cost).
            ChainError::EstimationFailed(_) => (
                StatusCode::BAD_REQUEST,
                "estimation_failed",
                self.0.to_string(),
            ),
            ChainError::ReceiptNotFound => {
                (StatusCode::NOT_FOUND, "not_found", self.0.to_string())
            }
            ChainError::NetworkUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                "network_unavailable",
                self.0.to_string(),
            ),
            ChainError::ConfirmationTimeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "confirmation_timeout",
                self.0.to_string(),
            ),
            ChainError::SigningFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "signing_failed",
                self.0.to_string(),
            ),
            ChainError::BroadcastFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "broadcast_failed",
                self.0.to_string(),
            ),
            ChainError::ConfirmationError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "confirmation_error",
                self.0.to_string(),
            ),
            // Diagnostics for the contract violation are already in
            // the logs; the caller gets a generic internal error.
            ChainError::MalformedSignedTx(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal error while preparing the signed transaction".to_string(),
            ),
            ChainError::ChainMismatch { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                self.0.to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(kind, detail = %self.0, "request failed");
        } else {
            tracing::debug!(kind, detail = %self.0, "request rejected");
        }

        (status, Json(ErrorBody { error: kind, detail })).into_response()
    }
}
