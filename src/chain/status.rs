//! Settlement status lookup by transaction hash.
//!
//! Purely read-only and independent of the submission pipeline: safe
//! to call unboundedly often and concurrently. Repeated queries for a
//! settled transaction return identical projections.

use alloy::primitives::TxHash;
use serde::Serialize;
use std::sync::Arc;

use crate::chain::client::LedgerClient;
use crate::chain::types::{ChainError, ChainResult, SettlementReceipt};

/// Caller-facing projection of a settlement receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptView {
    pub tx_hash: String,
    /// 1 for success, 0 for failure.
    pub status: u64,
    pub block_number: u64,
    pub block_hash: String,
    pub from: String,
    pub to: Option<String>,
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
}

impl From<&SettlementReceipt> for ReceiptView {
    fn from(receipt: &SettlementReceipt) -> Self {
        Self {
            tx_hash: format!("{:#x}", receipt.tx_hash),
            status: receipt.status_code(),
            block_number: receipt.block_number,
            block_hash: format!("{:#x}", receipt.block_hash),
            from: format!("{:#x}", receipt.from),
            to: receipt.to.map(|to| format!("{to:#x}")),
            gas_used: receipt.gas_used,
            cumulative_gas_used: receipt.cumulative_gas_used,
        }
    }
}

/// Looks up settlement receipts by identifier.
pub struct StatusQuery {
    client: Arc<dyn LedgerClient>,
}

impl StatusQuery {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self { client }
    }

    /// Fetch and project the receipt for a transaction hash.
    ///
    /// A malformed hash fails before any network call; an absent
    /// receipt is [`ChainError::ReceiptNotFound`], distinct from
    /// infrastructure failures.
    pub async fn status(&self, raw_hash: &str) -> ChainResult<ReceiptView> {
        let hash: TxHash = raw_hash
            .parse()
            .map_err(|_| ChainError::InvalidTxId(raw_hash.to_string()))?;

        match self.client.receipt(hash).await? {
            Some(receipt) => Ok(ReceiptView::from(&receipt)),
            None => Err(ChainError::ReceiptNotFound),
        }
    }
}

impl std::fmt::Debug for StatusQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusQuery").finish()
    }
}
