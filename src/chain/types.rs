//! Chain-specific types and error definitions.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use serde::Deserialize;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Intrinsic gas cost of a plain value transfer. Used as the gas limit
/// when no payload is attached and therefore no estimation was run.
pub const BASE_TRANSFER_GAS: u64 = 21_000;

/// Wei per ether (10^18).
const WEI_PER_ETHER: f64 = 1e18;

/// Errors that can occur while building, submitting, or querying
/// transactions. Each pipeline stage owns its variants; there is no
/// catch-all.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Destination address failed the network's format rule.
    #[error("invalid destination address: {0}")]
    InvalidAddress(String),

    /// Raw secret is not a well-formed signing key.
    #[error("invalid signing credential: {0}")]
    InvalidCredential(String),

    /// Transfer amount is negative or not representable in wei.
    #[error("invalid transfer amount: {0}")]
    InvalidAmount(String),

    /// Transaction identifier is not a valid 32-byte hash.
    #[error("invalid transaction id: {0}")]
    InvalidTxId(String),

    /// RPC connection failed, timed out, or returned a protocol error.
    #[error("ledger node unavailable: {0}")]
    NetworkUnavailable(String),

    /// Remote node rejected cost estimation (commonly insufficient
    /// balance to cover the worst-case cost).
    #[error("cost estimation failed: {0}")]
    EstimationFailed(String),

    /// The signing primitive itself reported an error.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The signing primitive returned a value with no usable raw
    /// encoding. Distinct from [`ChainError::SigningFailed`]: this
    /// guards the contract boundary, not the primitive.
    #[error("malformed signed transaction: {0}")]
    MalformedSignedTx(String),

    /// Broadcast of the raw encoding was rejected or failed.
    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),

    /// Finalization was not observed within the configured bound. Does
    /// not imply the transaction failed on-chain.
    #[error("transaction not confirmed within {0} seconds")]
    ConfirmationTimeout(u64),

    /// Waiting for the receipt failed for a reason other than timeout.
    #[error("confirmation failed: {0}")]
    ConfirmationError(String),

    /// The network has no record of the transaction (not yet mined, or
    /// unknown hash).
    #[error("transaction not found")]
    ReceiptNotFound,

    /// Connected node reports a different chain than configured.
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Inbound submission request. Owned by the handling request scope and
/// never persisted.
#[derive(Clone, Deserialize)]
pub struct SubmitRequest {
    /// Raw secret credential, hex encoded (with or without 0x prefix).
    pub private_key: String,
    /// Destination account address.
    pub to: String,
    /// Transfer amount in ether. Defaults to zero.
    #[serde(default)]
    pub value_ether: f64,
    /// Optional opaque payload, carried as the transaction input.
    #[serde(default)]
    pub data: Option<String>,
}

// Manual Debug so the credential can never leak through debug logging.
impl std::fmt::Debug for SubmitRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitRequest")
            .field("private_key", &"<redacted>")
            .field("to", &self.to)
            .field("value_ether", &self.value_ether)
            .field("data", &self.data)
            .finish()
    }
}

/// Canonical unsigned transaction, fully sequenced against live network
/// state. The sequence number is fetched fresh per request and must
/// still match the sender's on-chain state at broadcast time; the
/// network rejects it otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    /// Sender address, derived from the credential (never user-supplied).
    pub from: Address,
    /// Per-account sequence number at build time.
    pub nonce: u64,
    /// Destination address.
    pub to: Address,
    /// Transfer amount in wei.
    pub value: U256,
    /// Fee rate in wei, read from the network at build time.
    pub gas_price: u128,
    /// Chain identifier, fixed per deployment.
    pub chain_id: u64,
    /// Optional payload bytes.
    pub input: Option<Bytes>,
    /// Estimated cost ceiling. Present only when a payload was attached
    /// and estimation ran.
    pub gas_limit: Option<u64>,
}

impl UnsignedTx {
    /// Project into the RPC request shape, e.g. for cost estimation.
    pub fn to_request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_value(self.value)
            .with_nonce(self.nonce)
            .with_gas_price(self.gas_price)
            .with_chain_id(self.chain_id);
        if let Some(input) = &self.input {
            request = request.with_input(input.clone());
        }
        if let Some(gas) = self.gas_limit {
            request = request.with_gas_limit(gas);
        }
        request
    }

    /// Request shape handed to the signing primitive. A transaction
    /// without a payload carries no estimated ceiling, so the intrinsic
    /// transfer cost is substituted here.
    pub fn signing_request(&self) -> TransactionRequest {
        let mut request = self.to_request();
        if self.gas_limit.is_none() {
            request = request.with_gas_limit(BASE_TRANSFER_GAS);
        }
        request
    }
}

/// Signed, broadcast-ready transaction. `raw` is the canonical encoding
/// the network accepts; its presence is validated at the signing
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    /// Transaction hash under which the network will know it.
    pub hash: TxHash,
    /// Raw broadcast-ready encoding.
    pub raw: Bytes,
}

/// Settlement record produced by the network once a transaction is
/// finalized. Queryable indefinitely afterward by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    pub tx_hash: TxHash,
    /// True when the transaction executed successfully.
    pub success: bool,
    pub block_hash: B256,
    pub block_number: u64,
    pub from: Address,
    pub to: Option<Address>,
    /// Resource units consumed by this transaction.
    pub gas_used: u64,
    /// Cumulative resource units consumed in the containing block up to
    /// and including this transaction.
    pub cumulative_gas_used: u64,
}

impl SettlementReceipt {
    /// Network status code: 1 for success, 0 for failure.
    pub fn status_code(&self) -> u64 {
        if self.success {
            1
        } else {
            0
        }
    }
}

/// Convert an ether amount to wei.
///
/// Rejects negative amounts; precision follows the caller-supplied
/// float, matching the request schema.
pub fn ether_to_wei(value_ether: f64) -> ChainResult<U256> {
    if !value_ether.is_finite() || value_ether < 0.0 {
        return Err(ChainError::InvalidAmount(format!(
            "{value_ether} is not a non-negative amount"
        )));
    }
    let wei = value_ether * WEI_PER_ETHER;
    // The float-to-integer cast saturates; anything at or beyond
    // 2^128 wei is out of range, not a u128::MAX-wei transfer.
    if wei >= u128::MAX as f64 {
        return Err(ChainError::InvalidAmount(format!(
            "{value_ether} ether exceeds the representable wei range"
        )));
    }
    Ok(U256::from(wei as u128))
}
