//! Ledger RPC client with explicit timeouts and error classification.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint once at startup
//! - Query chain state (sequence numbers, fee rate, receipts)
//! - Broadcast raw transactions
//! - Provide a liveness probe for the remote node
//!
//! The client performs no retries and caches nothing: every call reads
//! live network state so that sequencing is as fresh as possible.

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::TransportResult;
use async_trait::async_trait;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::chain::types::{
    ChainConfig, ChainError, ChainResult, SettlementReceipt, UnsignedTx,
};
use crate::observability::metrics;

/// Remote procedure surface of the ledger node.
///
/// The single production implementation is [`RpcLedgerClient`]; tests
/// substitute a scripted mock. All operations may fail with
/// [`ChainError::NetworkUnavailable`] when the node is unreachable or
/// returns a protocol-level error.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Whether the remote node currently answers state queries.
    async fn is_connected(&self) -> bool;

    /// Current per-account sequence number (nonce).
    async fn sequence_number(&self, address: Address) -> ChainResult<u64>;

    /// Current fee rate (gas price) in wei.
    async fn fee_rate(&self) -> ChainResult<u128>;

    /// Estimate the resource cost of a candidate transaction.
    ///
    /// Remote rejection (e.g. insufficient balance for the worst-case
    /// cost) surfaces as [`ChainError::EstimationFailed`] with the
    /// node-supplied detail.
    async fn estimate_cost(&self, tx: &UnsignedTx) -> ChainResult<u64>;

    /// Broadcast a signed raw encoding, returning the transaction hash.
    async fn broadcast(&self, raw: &[u8]) -> ChainResult<TxHash>;

    /// Fetch the settlement receipt, `None` if the network has no
    /// record of the transaction yet.
    async fn receipt(&self, hash: TxHash) -> ChainResult<Option<SettlementReceipt>>;

    /// Wait for the receipt of a broadcast transaction, bounded by
    /// `wait`. Fails with [`ChainError::ConfirmationTimeout`] when the
    /// bound is exceeded.
    async fn await_receipt(&self, hash: TxHash, wait: Duration) -> ChainResult<SettlementReceipt>;
}

/// Production [`LedgerClient`] backed by an alloy JSON-RPC provider.
#[derive(Clone)]
pub struct RpcLedgerClient {
    provider: Arc<dyn Provider + Send + Sync>,
    /// Per-call RPC timeout.
    timeout_duration: Duration,
    /// Receipt poll cadence while awaiting finalization.
    poll_interval: Duration,
    rpc_url: String,
    chain_id: u64,
}

impl RpcLedgerClient {
    /// Connect to the configured node and verify it serves the
    /// configured chain.
    ///
    /// The chain-id query doubles as the initial liveness probe; an
    /// unreachable node or a chain mismatch is an error, which startup
    /// treats as fatal.
    pub async fn connect(config: &ChainConfig) -> ChainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::NetworkUnavailable(format!("invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        let client = Self {
            provider,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
            rpc_url: config.rpc_url.clone(),
            chain_id: config.chain_id,
        };

        let actual = client.rpc("chain id", client.provider.get_chain_id()).await?;
        if actual != config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: config.chain_id,
                actual,
            });
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            "ledger client connected"
        );
        Ok(client)
    }

    /// Run an RPC call under the per-call timeout, classifying failures.
    async fn rpc<T, F>(&self, what: &str, call: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
        F::IntoFuture: Send,
        T: Send,
    {
        match timeout(self.timeout_duration, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ChainError::NetworkUnavailable(format!("{what}: {e}"))),
            Err(_) => Err(ChainError::NetworkUnavailable(format!(
                "{what}: no response within {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn is_connected(&self) -> bool {
        let connected = self
            .rpc("block number", self.provider.get_block_number())
            .await
            .is_ok();
        metrics::record_ledger_health(connected);
        connected
    }

    async fn sequence_number(&self, address: Address) -> ChainResult<u64> {
        self.rpc(
            "sequence number",
            self.provider.get_transaction_count(address),
        )
        .await
    }

    async fn fee_rate(&self) -> ChainResult<u128> {
        self.rpc("fee rate", self.provider.get_gas_price()).await
    }

    async fn estimate_cost(&self, tx: &UnsignedTx) -> ChainResult<u64> {
        // A node-side rejection here is attributable to the request
        // (bad call data, insufficient balance), so it is classified
        // apart from connectivity failures.
        match timeout(
            self.timeout_duration,
            self.provider.estimate_gas(tx.to_request()),
        )
        .await
        {
            Ok(Ok(gas)) => Ok(gas),
            Ok(Err(e)) => Err(ChainError::EstimationFailed(e.to_string())),
            Err(_) => Err(ChainError::NetworkUnavailable(format!(
                "cost estimation: no response within {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }

    async fn broadcast(&self, raw: &[u8]) -> ChainResult<TxHash> {
        let pending = self
            .rpc("broadcast", self.provider.send_raw_transaction(raw))
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, hash: TxHash) -> ChainResult<Option<SettlementReceipt>> {
        let receipt = self
            .rpc("receipt", self.provider.get_transaction_receipt(hash))
            .await?;
        Ok(receipt.map(project_receipt))
    }

    async fn await_receipt(&self, hash: TxHash, wait: Duration) -> ChainResult<SettlementReceipt> {
        let result = timeout(wait, async {
            let mut ticker = interval(self.poll_interval);
            loop {
                ticker.tick().await;
                match self.receipt(hash).await? {
                    Some(receipt) => return Ok(receipt),
                    None => tracing::debug!(tx_hash = %hash, "transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(ChainError::ConfirmationTimeout(wait.as_secs())),
        }
    }
}

/// Project the RPC receipt shape into the settlement record.
///
/// Block fields default to zero for the degenerate case of a receipt
/// the node reports before inclusion metadata is available.
fn project_receipt(receipt: TransactionReceipt) -> SettlementReceipt {
    use alloy::consensus::TxReceipt;

    SettlementReceipt {
        tx_hash: receipt.transaction_hash,
        success: receipt.status(),
        block_hash: receipt.block_hash.unwrap_or_default(),
        block_number: receipt.block_number.unwrap_or_default(),
        from: receipt.from,
        to: receipt.to,
        gas_used: receipt.gas_used,
        cumulative_gas_used: receipt.inner.cumulative_gas_used(),
    }
}

impl std::fmt::Debug for RpcLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedgerClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
