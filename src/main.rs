//! Storefront - direct-to-consumer shop backend

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::{
    auth::TokenKeys,
    payment::{Payments, RazorpayClient},
    publisher::EventPublisher,
    seed::seed_catalog,
    store::{MemoryStore, PgStore, Store},
    AppState, Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(config.db_max_connections).connect(url).await?;
            let store = PgStore::new(pool);
            store.migrate().await?;
            if config.seed_catalog {
                seed_catalog(&store).await?;
            }
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, running on an in-memory store");
            let store = MemoryStore::new();
            seed_catalog(&store).await?;
            Arc::new(store)
        }
    };

    let payments = config.razorpay.as_ref().map(|keys| Payments {
        gateway: Arc::new(RazorpayClient::new(&config.razorpay_api_url, &keys.key_id, &keys.key_secret)),
        key_secret: keys.key_secret.clone(),
    });
    let events = EventPublisher::connect(config.nats_url.as_deref()).await;
    let state = AppState::new(store, payments, TokenKeys::new(config.jwt_secret.as_bytes()), events, &config.currency);

    let app = storefront::router(state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Storefront listening on {address}");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
