//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Inject the shared ledger client into every component
//! - Serve with graceful shutdown

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::chain::client::LedgerClient;
use crate::chain::{StatusQuery, SubmissionPipeline, TxBuilder};
use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::observability::metrics;

/// Application state injected into handlers.
///
/// Each request handler borrows these; the only shared mutable thing
/// underneath is the ledger connection, which is stateless RPC.
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<TxBuilder>,
    pub pipeline: Arc<SubmissionPipeline>,
    pub status: Arc<StatusQuery>,
    pub ledger: Arc<dyn LedgerClient>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around a connected ledger client.
    pub fn new(config: &GatewayConfig, ledger: Arc<dyn LedgerClient>) -> Self {
        let state = AppState {
            builder: Arc::new(TxBuilder::new(ledger.clone(), config.chain.chain_id)),
            pipeline: Arc::new(SubmissionPipeline::new(
                ledger.clone(),
                Duration::from_secs(config.chain.confirmation_timeout_secs),
            )),
            status: Arc::new(StatusQuery::new(ledger.clone())),
            ledger,
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/transactions", post(handlers::submit_transaction))
            .route("/transactions/{tx_hash}", get(handlers::transaction_status))
            .route("/health", get(handlers::health))
            // route_layer so the matched route template is available
            // for labeling; unmatched requests are not recorded
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router; used directly by integration tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Per-request metrics, labeled with the matched route template to
/// keep cardinality bounded.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
