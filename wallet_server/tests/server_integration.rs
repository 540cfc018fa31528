//! Integration tests for the HTTP wallet API.
//!
//! The router is driven with `oneshot` over the in-memory store, so these
//! tests need no database.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use std::num::NonZeroUsize;
use std::time::Duration;
use tower::ServiceExt; // For `oneshot` method
use wallet_core::admission::AdmissionGate;
use wallet_core::wallet::MemoryWalletStore;
use wallet_server::api::{AppState, create_router, wallets::ErrorResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper to create a test router over a fresh in-memory store
fn create_test_server() -> (axum::Router, AdmissionGate) {
    let gate = AdmissionGate::new(NonZeroUsize::new(4).unwrap());
    let state = AppState::gated(
        MemoryWalletStore::new(),
        gate.clone(),
        Some(Duration::from_secs(1)),
        "memory",
    );

    (create_router(state, REQUEST_TIMEOUT), gate)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn create(app: &axum::Router, wallet_id: &str) -> (StatusCode, String) {
    send(
        app,
        post_json(
            "/api/v1/wallets/wallet/create",
            &format!(r#"{{"walletId":"{wallet_id}"}}"#),
        ),
    )
    .await
}

async fn operate(
    app: &axum::Router,
    wallet_id: &str,
    operation: &str,
    amount: &str,
) -> (StatusCode, String) {
    send(
        app,
        post_json(
            "/api/v1/wallets/wallet",
            &format!(
                r#"{{"walletId":"{wallet_id}","operationType":"{operation}","amount":{amount}}}"#
            ),
        ),
    )
    .await
}

async fn balance(app: &axum::Router, wallet_id: &str) -> (StatusCode, String) {
    send(app, get(&format!("/api/v1/wallets/{wallet_id}"))).await
}

fn error_code(body: &str) -> String {
    let error: ErrorResponse = serde_json::from_str(body).unwrap();
    error.code
}

// ============================================================================
// Wallet Lifecycle
// ============================================================================

#[tokio::test]
async fn test_wallet_lifecycle() {
    let (app, gate) = create_test_server();

    assert_eq!(create(&app, "w1").await, (StatusCode::OK, "Wallet created\n".to_string()));
    assert_eq!(balance(&app, "w1").await, (StatusCode::OK, "0.00\n".to_string()));

    assert_eq!(
        operate(&app, "w1", "DEPOSIT", "10.50").await,
        (StatusCode::OK, "Operation complete\n".to_string())
    );
    assert_eq!(balance(&app, "w1").await.1, "10.50\n");

    assert_eq!(operate(&app, "w1", "WITHDRAW", "5.25").await.0, StatusCode::OK);
    assert_eq!(balance(&app, "w1").await.1, "5.25\n");

    let (status, body) = operate(&app, "w1", "WITHDRAW", "100").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "insufficient_funds");
    assert_eq!(balance(&app, "w1").await.1, "5.25\n");

    let (status, body) = balance(&app, "nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "wallet_not_found");

    assert_eq!(gate.in_flight(), 0);
}

#[tokio::test]
async fn test_withdraw_entire_balance() {
    let (app, _) = create_test_server();
    create(&app, "w1").await;
    operate(&app, "w1", "DEPOSIT", "3.30").await;

    assert_eq!(operate(&app, "w1", "WITHDRAW", "3.30").await.0, StatusCode::OK);
    assert_eq!(balance(&app, "w1").await.1, "0.00\n");
}

#[tokio::test]
async fn test_amount_is_rounded_to_cents() {
    let (app, _) = create_test_server();
    create(&app, "w1").await;

    operate(&app, "w1", "DEPOSIT", "\"10.004\"").await;
    assert_eq!(balance(&app, "w1").await.1, "10.00\n");

    operate(&app, "w1", "DEPOSIT", "\"0.005\"").await;
    assert_eq!(balance(&app, "w1").await.1, "10.01\n");
}

#[tokio::test]
async fn test_many_small_deposits() {
    let (app, _) = create_test_server();
    create(&app, "w1").await;

    let mut expected_cents: i64 = 0;
    for _ in 0..20 {
        let cents: i64 = rand::random_range(1..=500);
        expected_cents += cents;
        let amount = format!("{}.{:02}", cents / 100, cents % 100);
        assert_eq!(operate(&app, "w1", "DEPOSIT", &amount).await.0, StatusCode::OK);
    }

    let expected = format!("{}.{:02}\n", expected_cents / 100, expected_cents % 100);
    assert_eq!(balance(&app, "w1").await.1, expected);
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_duplicate_create_is_rejected() {
    let (app, _) = create_test_server();
    assert_eq!(create(&app, "w1").await.0, StatusCode::OK);

    let (status, body) = create(&app, "w1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "wallet_already_exists");
}

#[tokio::test]
async fn test_operation_on_unknown_wallet() {
    let (app, _) = create_test_server();

    let (status, body) = operate(&app, "ghost", "DEPOSIT", "1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "wallet_not_found");
}

#[tokio::test]
async fn test_non_positive_amounts_are_rejected() {
    let (app, _) = create_test_server();
    create(&app, "w1").await;

    for amount in ["0", "-5", "0.00"] {
        let (status, body) = operate(&app, "w1", "DEPOSIT", amount).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount}");
        assert_eq!(error_code(&body), "invalid_amount");
    }

    // Rejected before the store is consulted, so an unknown wallet does not matter.
    let (_, body) = operate(&app, "ghost", "WITHDRAW", "-1").await;
    assert_eq!(error_code(&body), "invalid_amount");

    assert_eq!(balance(&app, "w1").await.1, "0.00\n");
}

#[tokio::test]
async fn test_unknown_operation_type() {
    let (app, _) = create_test_server();
    create(&app, "w1").await;

    let (status, body) = operate(&app, "w1", "TRANSFER", "1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");
}

#[tokio::test]
async fn test_malformed_json() {
    let (app, _) = create_test_server();

    let (status, body) = send(&app, post_json("/api/v1/wallets/wallet/create", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");

    let (status, body) = send(&app, post_json("/api/v1/wallets/wallet", r#"{"walletId":"w1"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");
}

#[tokio::test]
async fn test_invalid_wallet_id() {
    let (app, _) = create_test_server();

    let (status, body) = create(&app, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_wallet_id");

    let long_id = "x".repeat(300);
    let (status, body) = balance(&app, &long_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_wallet_id");
}

#[tokio::test]
async fn test_wrong_method_and_unknown_path() {
    let (app, _) = create_test_server();

    let (status, _) = send(&app, get("/api/v1/wallets/wallet/create")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, get("/api/v2/wallets/w1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_closed_gate_returns_service_unavailable() {
    let (app, gate) = create_test_server();
    create(&app, "w1").await;
    gate.close();

    let (status, body) = balance(&app, "w1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&body), "unavailable");
}

// ============================================================================
// Health and Middleware
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["store"], "memory");
    assert_eq!(json["admission"]["capacity"], 4);
    assert_eq!(json["admission"]["in_flight"], 0);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_check_reports_closed_gate() {
    let (app, gate) = create_test_server();
    gate.close();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (app, _) = create_test_server();

    let response = app.oneshot(get("/health")).await.unwrap();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();

    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/api/v1/wallets/nope")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-42");
}

#[tokio::test]
async fn test_balance_is_plain_text() {
    let (app, _) = create_test_server();
    create(&app, "w1").await;

    let response = app.oneshot(get("/api/v1/wallets/w1")).await.unwrap();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap();

    assert!(content_type.starts_with("text/plain"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_never_overdraw() {
    let (app, gate) = create_test_server();
    create(&app, "w1").await;
    operate(&app, "w1", "DEPOSIT", "100").await;

    let mut handles = Vec::new();
    for _ in 0..30 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            operate(&app, "w1", "WITHDRAW", "7").await.0
        }));
    }

    let mut applied = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => applied += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(applied, 14);
    assert_eq!(rejected, 16);
    assert_eq!(balance(&app, "w1").await.1, "2.00\n");
    assert_eq!(gate.in_flight(), 0);
}
