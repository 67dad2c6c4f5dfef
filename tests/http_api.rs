//! Endpoint behavior through the full router, mock node behind it.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tx_gateway::config::GatewayConfig;
use tx_gateway::http::HttpServer;

mod common;
use common::{MockLedger, TEST_PRIVATE_KEY, TEST_RECIPIENT, TEST_SENDER};

fn router_with(ledger: MockLedger) -> Router {
    HttpServer::new(&GatewayConfig::default(), Arc::new(ledger)).router()
}

fn submit_body(data: Option<&str>) -> Body {
    Body::from(
        serde_json::to_vec(&json!({
            "private_key": TEST_PRIVATE_KEY,
            "to": TEST_RECIPIENT,
            "value_ether": 1.5,
            "data": data,
        }))
        .unwrap(),
    )
}

fn post_transactions(body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/transactions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn submit_returns_projected_receipt() {
    let ledger = MockLedger::settled();
    let expected_hash = format!("{:#x}", ledger.broadcast_hash);
    let app = router_with(ledger);

    let response = app
        .oneshot(post_transactions(submit_body(Some("loan-42"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["tx_hash"], expected_hash);
    assert_eq!(body["status"], 1);
    assert_eq!(body["block_number"], 1234);
    assert_eq!(body["gas_used"], 21_000);
    assert_eq!(body["logged_data"], "loan-42");
    assert!(body["message"].as_str().unwrap().contains("confirmed"));
}

#[tokio::test]
async fn submit_with_invalid_address_is_bad_request() {
    let app = router_with(MockLedger::settled());

    let body = Body::from(
        serde_json::to_vec(&json!({
            "private_key": TEST_PRIVATE_KEY,
            "to": "0xABCD",
            "value_ether": 1.5,
        }))
        .unwrap(),
    );
    let response = app.oneshot(post_transactions(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_address");
}

#[tokio::test]
async fn submit_with_invalid_credential_is_bad_request() {
    let app = router_with(MockLedger::settled());

    let body = Body::from(
        serde_json::to_vec(&json!({
            "private_key": "deadbeef",
            "to": TEST_RECIPIENT,
        }))
        .unwrap(),
    );
    let response = app.oneshot(post_transactions(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_credential");
}

#[tokio::test]
async fn estimation_rejection_maps_to_bad_request() {
    let ledger = MockLedger {
        estimation_rejection: Some("insufficient funds".to_string()),
        ..MockLedger::new()
    };
    let app = router_with(ledger);

    let response = app
        .oneshot(post_transactions(submit_body(Some("payload"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "estimation_failed");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("insufficient funds"));
}

#[tokio::test]
async fn confirmation_timeout_maps_to_gateway_timeout() {
    // Receipt never appears; shrink the bound so the test completes
    // quickly.
    let mut config = GatewayConfig::default();
    config.chain.confirmation_timeout_secs = 1;
    let app = HttpServer::new(&config, Arc::new(MockLedger::new())).router();

    let response = app
        .oneshot(post_transactions(submit_body(None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    let body = json_body(response).await;
    assert_eq!(body["error"], "confirmation_timeout");
}

#[tokio::test]
async fn status_of_settled_transaction() {
    let ledger = MockLedger::settled();
    let hash = format!("{:#x}", ledger.broadcast_hash);
    let app = router_with(ledger);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/transactions/{hash}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["tx_hash"], hash);
    assert_eq!(body["status"], 1);
    assert_eq!(body["block_number"], 1234);
    assert_eq!(body["from"].as_str().unwrap(), TEST_SENDER.to_lowercase());
    assert_eq!(body["cumulative_gas_used"], 63_000);
}

#[tokio::test]
async fn status_of_unknown_transaction_is_not_found() {
    let ledger = MockLedger::new();
    let hash = format!("{:#x}", ledger.broadcast_hash);
    let app = router_with(ledger);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/transactions/{hash}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn status_with_malformed_hash_is_bad_request() {
    let app = router_with(MockLedger::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/transactions/not-a-hash")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_tx_id");
}

#[tokio::test]
async fn health_reflects_connectivity_flag() {
    for connected in [true, false] {
        let ledger = MockLedger {
            connected,
            ..MockLedger::new()
        };
        let app = router_with(ledger);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["connected"], connected);
    }
}
