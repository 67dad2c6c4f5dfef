use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use tx_gateway::chain::RpcLedgerClient;
use tx_gateway::config::{load_config, GatewayConfig};
use tx_gateway::http::HttpServer;
use tx_gateway::observability;

/// Transaction submission gateway for an EVM-compatible ledger.
#[derive(Debug, Parser)]
#[command(name = "tx-gateway", version)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when absent.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.chain.rpc_url,
        chain_id = config.chain.chain_id,
        confirmation_timeout_secs = config.chain.confirmation_timeout_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "failed to parse metrics address"
            ),
        }
    }

    // One connection for the whole process. Connecting verifies both
    // reachability and the served chain id; failure here is fatal.
    let ledger = RpcLedgerClient::connect(&config.chain).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let server = HttpServer::new(&config, Arc::new(ledger));
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
