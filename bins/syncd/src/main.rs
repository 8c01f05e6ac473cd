//! Bankfeed Sync Daemon
//!
//! One-shot entry point: runs a full sync for one customer and prints the
//! result and the derived views as JSON. Ctrl-C cancels gracefully; accounts
//! already ingested keep their data.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankfeed_core::Pipeline;
use bankfeed_core::sync::SyncOptions;
use bankfeed_provider::HttpBankProvider;
use bankfeed_shared::AppConfig;
use bankfeed_shared::types::CustomerId;
use bankfeed_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bankfeed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    let mut args = std::env::args().skip(1);
    let customer_id = CustomerId::new(
        args.next()
            .ok_or_else(|| anyhow::anyhow!("usage: bankfeed-syncd <customer-id> <auth-code>"))?,
    );
    let auth_code = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: bankfeed-syncd <customer-id> <auth-code>"))?;

    // Wire the pipeline
    let provider = Arc::new(HttpBankProvider::new(&config.provider)?);
    let store = Arc::new(MemoryStore::new());
    let pipeline = Pipeline::new(
        provider,
        Arc::clone(&store),
        SyncOptions {
            max_concurrent_accounts: config.sync.max_concurrent_accounts,
        },
    );

    // Cancel on Ctrl-C
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing in-flight pages");
            signal_cancel.cancel();
        }
    });

    info!(customer_id = %customer_id, "starting one-shot sync");
    let result = pipeline.sync(&customer_id, &auth_code, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    // Derived views for the months just synced
    let payments = pipeline.get_recurring_payments(&customer_id).await?;
    println!("{}", serde_json::to_string_pretty(&payments)?);

    info!(
        accounts = store.account_count(),
        transactions = store.transaction_count(),
        recurring_patterns = payments.len(),
        "sync complete"
    );
    Ok(())
}
