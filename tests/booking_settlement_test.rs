use axum::http::StatusCode;
use fareledger::notify::LogNotifier;
use fareledger::{
    api, Config, LedgerStore, Money, Notifier, SettlementEngine, TransactionRecorder, WalletIndex,
    WalletKey,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    store: Arc<LedgerStore>,
    index: Arc<WalletIndex>,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = fareledger::init_db(&db_path).await.expect("init_db failed");
    let store = Arc::new(LedgerStore::new(pool));
    for key in WalletKey::all() {
        store.provision_wallet(key.store_name()).await.unwrap();
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
    let state = api::AppState::new(store.clone(), index.clone(), engine, recorder, config);
    let app = api::create_router(state);

    TestApp {
        app,
        store,
        index,
        _temp: temp_dir,
    }
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

async fn seed(test_app: &TestApp, key: WalletKey, amount: &str) {
    let (status, _) = post_json(
        test_app.app.clone(),
        "/v1/wallets/credit",
        json!({"key": key.to_string(), "amount": amount.parse::<f64>().unwrap()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

fn booking_body(id: &str, platform: &str, base: f64, markup: f64, commission: f64) -> serde_json::Value {
    json!({
        "id": id,
        "platform": platform,
        "basePay": base,
        "markupAmount": markup,
        "commissionAmount": commission,
    })
}

async fn balance(test_app: &TestApp, key: WalletKey) -> Money {
    test_app.index.balance_of(key).await
}

#[tokio::test]
async fn test_platform_booking_scenario() {
    // AlHind booking: base 1000, markup 200, commission 150.
    // Expected postings: alhind -1000, alhind +150, office +1200.
    let test_app = setup_test_app().await;
    seed(&test_app, WalletKey::Alhind, "5000").await;

    let (status, body) = post_json(
        test_app.app.clone(),
        "/v1/bookings/apply",
        booking_body("bk-1", "alhind", 1000.0, 200.0, 150.0),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookingId"], "bk-1");
    assert_eq!(body["status"], "applied");
    assert_eq!(body["postings"], 3);
    assert_eq!(body["balances"]["alhind"], "4150");
    assert_eq!(body["balances"]["office"], "1200");

    // Net change: alhind -850, office +1200.
    assert_eq!(
        balance(&test_app, WalletKey::Alhind).await,
        Money::parse("4150").unwrap()
    );
    assert_eq!(
        balance(&test_app, WalletKey::Office).await,
        Money::parse("1200").unwrap()
    );
}

#[tokio::test]
async fn test_direct_booking_touches_only_office() {
    let test_app = setup_test_app().await;

    let (status, body) = post_json(
        test_app.app.clone(),
        "/v1/bookings/apply",
        booking_body("bk-2", "direct", 500.0, 100.0, 0.0),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["postings"], 1);
    assert_eq!(body["balances"]["office"], "600");
    assert!(body["balances"].get("alhind").is_none());
    assert!(body["balances"].get("akbar").is_none());

    assert_eq!(balance(&test_app, WalletKey::Alhind).await, Money::zero());
    assert_eq!(balance(&test_app, WalletKey::Akbar).await, Money::zero());
}

#[tokio::test]
async fn test_apply_then_refund_restores_balances_exactly() {
    let test_app = setup_test_app().await;
    seed(&test_app, WalletKey::Alhind, "5000").await;
    seed(&test_app, WalletKey::Office, "300").await;

    let body = booking_body("bk-3", "alhind", 1000.0, 200.0, 150.0);
    let (status, _) = post_json(test_app.app.clone(), "/v1/bookings/apply", body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = post_json(test_app.app.clone(), "/v1/bookings/refund", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "unapplied");

    assert_eq!(
        balance(&test_app, WalletKey::Alhind).await,
        Money::parse("5000").unwrap()
    );
    assert_eq!(
        balance(&test_app, WalletKey::Office).await,
        Money::parse("300").unwrap()
    );
}

#[tokio::test]
async fn test_double_apply_is_rejected_with_conflict() {
    let test_app = setup_test_app().await;
    seed(&test_app, WalletKey::Alhind, "5000").await;

    let body = booking_body("bk-4", "alhind", 1000.0, 0.0, 0.0);
    let (status, _) = post_json(test_app.app.clone(), "/v1/bookings/apply", body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = post_json(test_app.app.clone(), "/v1/bookings/apply", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(resp["error"].as_str().unwrap().contains("applied"));

    assert_eq!(
        balance(&test_app, WalletKey::Alhind).await,
        Money::parse("4000").unwrap()
    );
}

#[tokio::test]
async fn test_refund_before_apply_is_rejected() {
    let test_app = setup_test_app().await;

    let (status, _) = post_json(
        test_app.app.clone(),
        "/v1/bookings/refund",
        booking_body("bk-5", "direct", 100.0, 0.0, 0.0),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(balance(&test_app, WalletKey::Office).await, Money::zero());
}

#[tokio::test]
async fn test_deleted_booking_cannot_be_reapplied() {
    let test_app = setup_test_app().await;
    seed(&test_app, WalletKey::Akbar, "2000").await;

    let body = booking_body("bk-6", "akbar", 500.0, 50.0, 25.0);
    post_json(test_app.app.clone(), "/v1/bookings/apply", body.clone()).await;
    let (status, resp) = post_json(
        test_app.app.clone(),
        "/v1/bookings/refund-on-delete",
        body.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "reversed");

    let (status, _) = post_json(test_app.app.clone(), "/v1/bookings/apply", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_failed_leg_rolls_back_whole_settlement() {
    let test_app = setup_test_app().await;
    // Platform wallet can't cover the base pay: whole apply must fail
    // with no partial postings.
    seed(&test_app, WalletKey::Alhind, "500").await;

    let (status, resp) = post_json(
        test_app.app.clone(),
        "/v1/bookings/apply",
        booking_body("bk-7", "alhind", 1000.0, 200.0, 150.0),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(resp["error"]
        .as_str()
        .unwrap()
        .contains("Insufficient balance"));

    assert_eq!(
        balance(&test_app, WalletKey::Alhind).await,
        Money::parse("500").unwrap()
    );
    assert_eq!(balance(&test_app, WalletKey::Office).await, Money::zero());

    // Status rolled back: the booking can apply once funds exist.
    seed(&test_app, WalletKey::Alhind, "1000").await;
    let (status, _) = post_json(
        test_app.app.clone(),
        "/v1/bookings/apply",
        booking_body("bk-7", "alhind", 1000.0, 200.0, 150.0),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_zero_amount_booking_writes_no_postings() {
    let test_app = setup_test_app().await;

    let (status, resp) = post_json(
        test_app.app.clone(),
        "/v1/bookings/apply",
        booking_body("bk-8", "direct", 0.0, 0.0, 0.0),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["postings"], 0);

    let recent = test_app.store.list_recent_postings(10).await.unwrap();
    assert!(recent.is_empty());
}

#[tokio::test]
async fn test_negative_amounts_rejected_before_any_write() {
    let test_app = setup_test_app().await;

    let (status, _) = post_json(
        test_app.app.clone(),
        "/v1/bookings/apply",
        booking_body("bk-9", "alhind", -100.0, 0.0, 0.0),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(test_app.store.list_recent_postings(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cached_balances_equal_replayed_posting_log() {
    let test_app = setup_test_app().await;
    seed(&test_app, WalletKey::Alhind, "5000").await;
    seed(&test_app, WalletKey::Office, "100").await;

    let b1 = booking_body("bk-10", "alhind", 1000.0, 200.0, 150.0);
    let b2 = booking_body("bk-11", "direct", 500.0, 100.0, 0.0);
    post_json(test_app.app.clone(), "/v1/bookings/apply", b1.clone()).await;
    post_json(test_app.app.clone(), "/v1/bookings/apply", b2).await;
    post_json(test_app.app.clone(), "/v1/bookings/refund", b1).await;

    for wallet in test_app.store.fetch_wallets().await.unwrap() {
        let replayed = test_app.store.replay_balance(&wallet.id).await.unwrap();
        assert_eq!(
            wallet.balance, replayed,
            "cached balance diverged from posting log for {}",
            wallet.name
        );
    }
}
