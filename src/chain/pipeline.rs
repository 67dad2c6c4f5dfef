//! Submission pipeline: sign, broadcast, await finalization.
//!
//! Stages run strictly in sequence and no stage is retried. Every
//! failure is classified at its own boundary; no partial success is
//! reported as success. A transaction that broadcasts but never
//! finalizes within the bound is reported as a confirmation failure
//! even though it may already be irreversibly on-chain — broadcast,
//! once sent, cannot be undone, so nothing is rolled back here.

use std::sync::Arc;
use std::time::Duration;

use crate::chain::client::LedgerClient;
use crate::chain::types::{ChainError, ChainResult, UnsignedTx};
use crate::chain::wallet::Wallet;
use crate::observability::metrics;

use alloy::primitives::TxHash;

/// Outcome of a finalized submission, projected from the settlement
/// receipt. The original payload is echoed back for caller confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub tx_hash: TxHash,
    /// Network status code: 1 success, 0 failure.
    pub status: u64,
    pub gas_used: u64,
    pub block_number: u64,
    pub echoed_data: Option<String>,
}

/// Orchestrates sign → broadcast → await-finalization.
pub struct SubmissionPipeline {
    client: Arc<dyn LedgerClient>,
    /// Bound on the finalization wait.
    confirmation_timeout: Duration,
}

impl SubmissionPipeline {
    pub fn new(client: Arc<dyn LedgerClient>, confirmation_timeout: Duration) -> Self {
        Self {
            client,
            confirmation_timeout,
        }
    }

    /// Submit a built transaction and wait for its receipt.
    pub async fn submit(
        &self,
        tx: UnsignedTx,
        wallet: &Wallet,
        echoed_data: Option<String>,
    ) -> ChainResult<SubmissionOutcome> {
        // Stage 1: sign. Wallet distinguishes primitive failure from a
        // structurally unusable result.
        let signed = wallet.sign(&tx).await?;

        // Stage 2: broadcast the raw encoding.
        let tx_hash = match self.client.broadcast(&signed.raw).await {
            Ok(hash) => hash,
            Err(ChainError::NetworkUnavailable(detail)) => {
                return Err(ChainError::BroadcastFailed(detail))
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            tx_hash = %tx_hash,
            from = %tx.from,
            nonce = tx.nonce,
            "transaction broadcast"
        );

        // Stage 3: bounded wait for finalization. Timeout keeps its
        // own identity; other wait failures become confirmation errors.
        let receipt = match self
            .client
            .await_receipt(tx_hash, self.confirmation_timeout)
            .await
        {
            Ok(receipt) => receipt,
            Err(timeout @ ChainError::ConfirmationTimeout(_)) => {
                metrics::record_submission("timeout");
                return Err(timeout);
            }
            Err(ChainError::NetworkUnavailable(detail)) => {
                return Err(ChainError::ConfirmationError(detail))
            }
            Err(e) => return Err(ChainError::ConfirmationError(e.to_string())),
        };

        tracing::info!(
            tx_hash = %tx_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            status = receipt.status_code(),
            "transaction finalized"
        );
        metrics::record_submission(if receipt.success { "confirmed" } else { "reverted" });

        // Stage 4: project the receipt into the response shape.
        Ok(SubmissionOutcome {
            tx_hash,
            status: receipt.status_code(),
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
            echoed_data,
        })
    }
}

impl std::fmt::Debug for SubmissionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionPipeline")
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}
