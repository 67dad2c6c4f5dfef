//! Ledger interaction subsystem — the core of the gateway.
//!
//! # Data Flow
//! ```text
//! SubmitRequest
//!     → builder.rs (validate, derive sender, sequence, estimate)
//!     → wallet.rs (sign, validate signer output shape)
//!     → pipeline.rs (broadcast, bounded wait, project receipt)
//!
//! Status lookup:
//!     tx hash → status.rs → client.rs → ReceiptView
//! ```
//!
//! # Constraints
//! - One shared [`client::LedgerClient`] connection, created at
//!   startup and injected by `Arc`; no globals
//! - No nonce or fee caching; live state is read per request
//! - Raw secrets are never logged and never outlive the request

pub mod builder;
pub mod client;
pub mod pipeline;
pub mod status;
pub mod types;
pub mod wallet;

pub use builder::TxBuilder;
pub use client::{LedgerClient, RpcLedgerClient};
pub use pipeline::{SubmissionOutcome, SubmissionPipeline};
pub use status::{ReceiptView, StatusQuery};
pub use types::{ChainError, ChainResult, SettlementReceipt, SignedTx, SubmitRequest, UnsignedTx};
pub use wallet::Wallet;
