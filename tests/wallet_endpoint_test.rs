use axum::http::StatusCode;
use fareledger::notify::LogNotifier;
use fareledger::{
    api, Config, LedgerStore, Notifier, SettlementEngine, TransactionRecorder, WalletIndex,
    WalletKey,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    store: Arc<LedgerStore>,
    _temp: TempDir,
}

async fn setup_test_app(provision: bool) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = fareledger::init_db(&db_path).await.expect("init_db failed");
    let store = Arc::new(LedgerStore::new(pool));
    if provision {
        for key in WalletKey::all() {
            store.provision_wallet(key.store_name()).await.unwrap();
        }
    }

    let index = Arc::new(WalletIndex::new(store.clone()));
    index.reload().await.unwrap();
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let recorder = Arc::new(TransactionRecorder::new(
        store.clone(),
        index.clone(),
        notifier.clone(),
    ));
    let engine = Arc::new(SettlementEngine::new(
        store.clone(),
        index.clone(),
        notifier,
    ));

    let config = Config {
        port: 0,
        database_path: db_path,
        seed_wallets: false,
        history_limit: 100,
    };
    let state = api::AppState::new(store.clone(), index, engine, recorder, config);
    let app = api::create_router(state);

    TestApp {
        app,
        store,
        _temp: temp_dir,
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(app: axum::Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_credit_then_read_balance() {
    let test_app = setup_test_app(true).await;

    let (status, body) = post_json(
        test_app.app.clone(),
        "/v1/wallets/credit",
        json!({"key": "office", "amount": 150.25, "actor": "Tester"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "150.25");
    assert_eq!(body["formatted"], "150.25");

    let (status, body) = get(test_app.app.clone(), "/v1/wallets/balance?key=office").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "office");
    assert_eq!(body["balance"], "150.25");
}

#[tokio::test]
async fn test_debit_reduces_balance() {
    let test_app = setup_test_app(true).await;
    post_json(
        test_app.app.clone(),
        "/v1/wallets/credit",
        json!({"key": "akbar", "amount": 100}),
    )
    .await;

    let (status, body) = post_json(
        test_app.app.clone(),
        "/v1/wallets/debit",
        json!({"key": "akbar", "amount": 40}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "60");
}

#[tokio::test]
async fn test_debit_exceeding_balance_fails_and_balance_unchanged() {
    // Office balance 30, debit 50: InsufficientBalance, balance stays 30.
    let test_app = setup_test_app(true).await;
    post_json(
        test_app.app.clone(),
        "/v1/wallets/credit",
        json!({"key": "office", "amount": 30}),
    )
    .await;

    let (status, body) = post_json(
        test_app.app.clone(),
        "/v1/wallets/debit",
        json!({"key": "office", "amount": 50}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Insufficient balance in office"));

    let (_, body) = get(test_app.app.clone(), "/v1/wallets/balance?key=office").await;
    assert_eq!(body["balance"], "30");
}

#[tokio::test]
async fn test_non_positive_amounts_are_bad_requests() {
    let test_app = setup_test_app(true).await;

    for amount in [0, -5] {
        let (status, _) = post_json(
            test_app.app.clone(),
            "/v1/wallets/credit",
            json!({"key": "office", "amount": amount}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            test_app.app.clone(),
            "/v1/wallets/debit",
            json!({"key": "office", "amount": amount}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert!(test_app.store.list_recent_postings(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_key_is_bad_request() {
    let test_app = setup_test_app(true).await;
    let (status, _) = get(test_app.app.clone(), "/v1/wallets/balance?key=petty-cash").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unprovisioned_wallet_reads_zero_but_rejects_postings() {
    let test_app = setup_test_app(false).await;

    // Best-effort cache read: zero for unmapped keys.
    let (status, body) = get(test_app.app.clone(), "/v1/wallets/balance?key=office").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "0");

    // Posting against a missing wallet is a hard failure.
    let (status, body) = post_json(
        test_app.app.clone(),
        "/v1/wallets/credit",
        json!({"key": "office", "amount": 100}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("office"));
}

#[tokio::test]
async fn test_list_wallets_reports_all_keys_with_formatted_balances() {
    let test_app = setup_test_app(true).await;
    post_json(
        test_app.app.clone(),
        "/v1/wallets/credit",
        json!({"key": "alhind", "amount": 1234.5}),
    )
    .await;

    let (status, body) = get(test_app.app.clone(), "/v1/wallets").await;
    assert_eq!(status, StatusCode::OK);
    let wallets = body["wallets"].as_array().unwrap();
    assert_eq!(wallets.len(), 3);

    let alhind = wallets
        .iter()
        .find(|w| w["key"] == "alhind")
        .expect("alhind entry");
    assert_eq!(alhind["name"], "AlHind");
    assert_eq!(alhind["balance"], "1234.5");
    assert_eq!(alhind["formatted"], "1234.50");
}

#[tokio::test]
async fn test_transactions_listing_maps_operation_and_key() {
    let test_app = setup_test_app(true).await;
    post_json(
        test_app.app.clone(),
        "/v1/wallets/credit",
        json!({"key": "office", "amount": 100, "actor": "Tester", "description": "seed"}),
    )
    .await;
    post_json(
        test_app.app.clone(),
        "/v1/wallets/debit",
        json!({"key": "office", "amount": 25, "actor": "Tester"}),
    )
    .await;

    let (status, body) = get(test_app.app.clone(), "/v1/transactions").await;
    assert_eq!(status, StatusCode::OK);
    let txs = body["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 2);

    // Newest first: the debit comes before the credit.
    assert_eq!(txs[0]["operation"], "debit");
    assert_eq!(txs[0]["amount"], "25");
    assert_eq!(txs[0]["walletKey"], "office");
    assert_eq!(txs[0]["actor"], "Tester");
    assert_eq!(txs[0]["tag"], "manual_debit");
    assert_eq!(txs[1]["operation"], "credit");
    assert_eq!(txs[1]["amount"], "100");
    assert_eq!(txs[1]["description"], "seed");
}

#[tokio::test]
async fn test_transactions_limit_is_applied() {
    let test_app = setup_test_app(true).await;
    for _ in 0..5 {
        post_json(
            test_app.app.clone(),
            "/v1/wallets/credit",
            json!({"key": "office", "amount": 10}),
        )
        .await;
    }

    let (status, body) = get(test_app.app.clone(), "/v1/transactions?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 3);

    let (status, _) = get(test_app.app.clone(), "/v1/transactions?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_ready() {
    let test_app = setup_test_app(false).await;
    let (status, body) = get(test_app.app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(test_app.app.clone(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
