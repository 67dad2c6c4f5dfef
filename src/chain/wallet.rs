//! Sender identity derivation and the signing boundary.
//!
//! # Security
//! - The raw secret arrives in the request body and lives only for the
//!   request scope; it is never logged or serialized
//! - The signing primitive is a black box; its output shape is
//!   validated here before anything downstream trusts it

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::chain::types::{ChainError, ChainResult, SignedTx, UnsignedTx};

/// Per-request wallet derived from the caller's raw secret.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Derive a wallet from a hex-encoded raw secret (with or without
    /// 0x prefix). A malformed secret fails before any network call.
    pub fn from_raw_secret(secret_hex: &str) -> ChainResult<Self> {
        let key_hex = secret_hex.strip_prefix("0x").unwrap_or(secret_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::InvalidCredential(format!("not a well-formed key: {e}")))?;

        Ok(Self { signer })
    }

    /// The sender address derived from the secret.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign an unsigned transaction into its broadcast-ready encoding.
    ///
    /// The signing primitive's output is an external contract: the raw
    /// encoding must be present and non-empty. Its absence is
    /// translated into the distinct [`ChainError::MalformedSignedTx`]
    /// rather than trusted downstream, with full diagnostics logged
    /// here and never surfaced to the caller.
    pub async fn sign(&self, tx: &UnsignedTx) -> ChainResult<SignedTx> {
        let wallet = EthereumWallet::from(self.signer.clone());

        let envelope = tx
            .signing_request()
            .build(&wallet)
            .await
            .map_err(|e| ChainError::SigningFailed(e.to_string()))?;

        let raw = envelope.encoded_2718();
        if raw.is_empty() {
            tracing::error!(
                envelope = ?envelope,
                from = %self.address(),
                nonce = tx.nonce,
                "signer returned an envelope with no raw encoding"
            );
            return Err(ChainError::MalformedSignedTx(
                "signed transaction exposes no raw encoding".to_string(),
            ));
        }

        Ok(SignedTx {
            hash: *envelope.tx_hash(),
            raw: raw.into(),
        })
    }
}

// Manual Debug so the signer key can never leak through debug logging.
impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .finish()
    }
}
