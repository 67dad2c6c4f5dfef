//! Shared test utilities: a scripted ledger client with call counters.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, B256};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tx_gateway::chain::client::LedgerClient;
use tx_gateway::chain::types::{ChainError, ChainResult, SettlementReceipt, UnsignedTx};

/// Well-known test private key (Anvil's first account).
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address derived from [`TEST_PRIVATE_KEY`].
pub const TEST_SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// A valid destination address for requests.
pub const TEST_RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// Scripted [`LedgerClient`] standing in for the remote node.
///
/// Every operation counts its invocations so tests can assert which
/// network calls did (or did not) happen.
pub struct MockLedger {
    pub connected: bool,
    pub nonce: u64,
    pub fee: u128,
    pub estimated_gas: u64,
    /// When set, estimation is rejected with this detail.
    pub estimation_rejection: Option<String>,
    /// When true, sequencing and fee calls fail with a network error.
    pub network_down: bool,
    /// When true, broadcast fails with a network error.
    pub broadcast_down: bool,
    /// When true, the receipt wait fails with a network error rather
    /// than timing out.
    pub await_down: bool,
    pub broadcast_hash: TxHash,
    /// Receipt the network reports; `None` means never finalized.
    pub receipt: Option<SettlementReceipt>,

    pub nonce_calls: AtomicUsize,
    pub fee_calls: AtomicUsize,
    pub estimate_calls: AtomicUsize,
    pub broadcast_calls: AtomicUsize,
    pub receipt_calls: AtomicUsize,
    pub await_calls: AtomicUsize,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            connected: true,
            nonce: 5,
            fee: 1,
            estimated_gas: 42_000,
            estimation_rejection: None,
            network_down: false,
            broadcast_down: false,
            await_down: false,
            broadcast_hash: TxHash::with_last_byte(0xaa),
            receipt: None,
            nonce_calls: AtomicUsize::new(0),
            fee_calls: AtomicUsize::new(0),
            estimate_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
            receipt_calls: AtomicUsize::new(0),
            await_calls: AtomicUsize::new(0),
        }
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock scripted for a full happy submission cycle.
    pub fn settled() -> Self {
        let hash = TxHash::with_last_byte(0xaa);
        Self {
            receipt: Some(settled_receipt(hash)),
            broadcast_hash: hash,
            ..Self::default()
        }
    }

    /// Total network calls made across all operations.
    pub fn total_calls(&self) -> usize {
        self.nonce_calls.load(Ordering::SeqCst)
            + self.fee_calls.load(Ordering::SeqCst)
            + self.estimate_calls.load(Ordering::SeqCst)
            + self.broadcast_calls.load(Ordering::SeqCst)
            + self.receipt_calls.load(Ordering::SeqCst)
            + self.await_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn sequence_number(&self, _address: Address) -> ChainResult<u64> {
        self.nonce_calls.fetch_add(1, Ordering::SeqCst);
        if self.network_down {
            return Err(ChainError::NetworkUnavailable(
                "sequence number: connection refused".to_string(),
            ));
        }
        Ok(self.nonce)
    }

    async fn fee_rate(&self) -> ChainResult<u128> {
        self.fee_calls.fetch_add(1, Ordering::SeqCst);
        if self.network_down {
            return Err(ChainError::NetworkUnavailable(
                "fee rate: connection refused".to_string(),
            ));
        }
        Ok(self.fee)
    }

    async fn estimate_cost(&self, _tx: &UnsignedTx) -> ChainResult<u64> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        match &self.estimation_rejection {
            Some(detail) => Err(ChainError::EstimationFailed(detail.clone())),
            None => Ok(self.estimated_gas),
        }
    }

    async fn broadcast(&self, _raw: &[u8]) -> ChainResult<TxHash> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        if self.broadcast_down {
            return Err(ChainError::NetworkUnavailable(
                "broadcast: connection reset".to_string(),
            ));
        }
        Ok(self.broadcast_hash)
    }

    async fn receipt(&self, _hash: TxHash) -> ChainResult<Option<SettlementReceipt>> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.receipt.clone())
    }

    async fn await_receipt(&self, _hash: TxHash, wait: Duration) -> ChainResult<SettlementReceipt> {
        self.await_calls.fetch_add(1, Ordering::SeqCst);
        if self.await_down {
            return Err(ChainError::NetworkUnavailable(
                "receipt: connection reset".to_string(),
            ));
        }
        match &self.receipt {
            Some(receipt) => Ok(receipt.clone()),
            // Never finalizes: burn the full bound, then time out,
            // exactly as the production client would.
            None => {
                tokio::time::sleep(wait).await;
                Err(ChainError::ConfirmationTimeout(wait.as_secs()))
            }
        }
    }
}

/// A successful settlement receipt for `hash` in block 1234.
pub fn settled_receipt(hash: TxHash) -> SettlementReceipt {
    SettlementReceipt {
        tx_hash: hash,
        success: true,
        block_hash: B256::with_last_byte(0xbb),
        block_number: 1234,
        from: TEST_SENDER.parse().unwrap(),
        to: Some(TEST_RECIPIENT.parse().unwrap()),
        gas_used: 21_000,
        cumulative_gas_used: 63_000,
    }
}
