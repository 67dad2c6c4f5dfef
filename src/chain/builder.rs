//! Transaction assembly against live network state.
//!
//! # Responsibilities
//! - Validate the destination address before any network call
//! - Derive the sender identity from the request credential
//! - Sequence the transaction (fresh nonce, current fee rate)
//! - Run cost estimation when a payload is attached
//!
//! Two to three RPC calls per invocation, no caching: re-reading live
//! state keeps sequencing as fresh as possible across concurrent
//! requests. Concurrent submissions from the same sender can still race
//! on the sequence number; the network rejects the stale one and the
//! failure surfaces at broadcast time.

use alloy::primitives::{Address, Bytes};
use std::sync::Arc;

use crate::chain::client::LedgerClient;
use crate::chain::types::{ether_to_wei, ChainResult, ChainError, SubmitRequest, UnsignedTx};
use crate::chain::wallet::Wallet;

/// Builds canonical unsigned transactions from validated requests.
pub struct TxBuilder {
    client: Arc<dyn LedgerClient>,
    /// Chain identifier, fixed per deployment.
    chain_id: u64,
}

impl TxBuilder {
    pub fn new(client: Arc<dyn LedgerClient>, chain_id: u64) -> Self {
        Self { client, chain_id }
    }

    /// Assemble an unsigned transaction and the wallet that will sign
    /// it.
    ///
    /// Each step is a distinct failure point; input validation fails
    /// before the first network call is made.
    pub async fn build(&self, request: &SubmitRequest) -> ChainResult<(UnsignedTx, Wallet)> {
        let to: Address = request
            .to
            .parse()
            .map_err(|_| ChainError::InvalidAddress(request.to.clone()))?;

        let wallet = Wallet::from_raw_secret(&request.private_key)?;
        let value = ether_to_wei(request.value_ether)?;

        let nonce = self.client.sequence_number(wallet.address()).await?;
        let gas_price = self.client.fee_rate().await?;

        let input = request
            .data
            .as_ref()
            .filter(|data| !data.is_empty())
            .map(|data| Bytes::from(data.clone().into_bytes()));

        let mut tx = UnsignedTx {
            from: wallet.address(),
            nonce,
            to,
            value,
            gas_price,
            chain_id: self.chain_id,
            input,
            gas_limit: None,
        };

        // The estimated ceiling exists only for payload-carrying
        // transactions; a plain transfer costs the intrinsic amount.
        if tx.input.is_some() {
            let estimated = self.client.estimate_cost(&tx).await?;
            tx.gas_limit = Some(estimated);
            tracing::debug!(
                from = %tx.from,
                nonce = tx.nonce,
                estimated_gas = estimated,
                "cost estimation complete"
            );
        }

        Ok((tx, wallet))
    }
}

impl std::fmt::Debug for TxBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxBuilder")
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
