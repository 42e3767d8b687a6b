mod assets;
mod config;

use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use chapel_api::AppStateInner;
use chapel_store::rest::RestClient;
use chapel_store::seed::{seed_owner, seed_settings};
use chapel_store::{RestStore, Store};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chapel=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let store: Arc<dyn Store> = Arc::new(RestStore::new(RestClient::new(
        &config.store_url,
        &config.store_key,
    )));

    seed_settings(store.as_ref()).await;
    match config.owner.clone() {
        Some(owner) => seed_owner(store.as_ref(), owner).await,
        None => info!("No owner account configured, skipping owner seed"),
    }

    let app = assets::with_assets(chapel_api::router(AppStateInner::new(store)), &config.assets)
        .layer(TraceLayer::new_for_http());

    info!("Chapel server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Could not install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
