//! Transaction Gateway
//!
//! An HTTP service that builds, signs, and submits transactions to a
//! remote EVM-compatible ledger and reports their settlement status.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               TX GATEWAY                      │
//!                    │                                               │
//!   POST /transactions   ┌────────┐   ┌─────────┐   ┌────────────┐  │
//!   ────────────────────▶│  http  │──▶│ builder │──▶│  pipeline  │  │
//!                    │   │handlers│   │sequence,│   │sign → send │  │
//!                    │   └────────┘   │estimate │   │→ await     │  │
//!                    │        │       └────┬────┘   └─────┬──────┘  │
//!   GET /transactions/{h}     │            │              │         │
//!   ────────────────────▶ status query     ▼              ▼         │
//!                    │        │       ┌──────────────────────────┐  │
//!                    │        └──────▶│   LedgerClient (RPC)     │──┼──▶ ledger node
//!                    │                └──────────────────────────┘  │
//!                    │                                               │
//!                    │   Cross-cutting: config, observability        │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The ledger connection is created once at startup (a failed initial
//! liveness probe is fatal) and injected into every component. Each
//! request runs on its own task; the only shared state is that
//! read-only connection.

// Core subsystem
pub mod chain;

// Plumbing
pub mod config;
pub mod http;
pub mod observability;

pub use chain::{LedgerClient, RpcLedgerClient};
pub use config::GatewayConfig;
pub use http::HttpServer;
