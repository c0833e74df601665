use fareledger::notify::LogNotifier;
use fareledger::{
    api, config::Config, db::init_db, LedgerStore, Notifier, SettlementEngine,
    TransactionRecorder, WalletIndex, WalletKey,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Initialize the ledger store
    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize ledger store: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(LedgerStore::new(pool));

    if config.seed_wallets {
        for key in WalletKey::all() {
            if let Err(e) = store.provision_wallet(key.store_name()).await {
                eprintln!("Failed to provision wallet {}: {}", key, e);
                std::process::exit(1);
            }
        }
        tracing::info!("Seeded fixed wallet set");
    }

    let index = Arc::new(WalletIndex::new(store.clone()));
    if let Err(e) = index.reload().await {
        // Wallets may not be provisioned yet; reads report zero until
        // the first successful reload.
        tracing::warn!(error = %e, "initial wallet index load failed");
    }

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let recorder = Arc::new(TransactionRecorder::new(
        store.clone(),
        index.clone(),
        notifier.clone(),
    ));
    let engine = Arc::new(SettlementEngine::new(
        store.clone(),
        index.clone(),
        notifier.clone(),
    ));

    // Create router
    let app = api::create_router(api::AppState::new(store, index, engine, recorder, config));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
