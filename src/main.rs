//! skincache CLI - sync the skin catalog once and refresh account unlocks.
//!
//! Runs one reconciliation pass against the remote catalog, then refreshes
//! the account unlock overlay if an API key is available (the `GW2_API_KEY`
//! environment variable, falling back to the OS keychain), and prints a
//! short summary. `--clear-cache` wipes the local skin store instead.

use std::io;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skincache::api::CatalogClient;
use skincache::auth::ApiKeyStore;
use skincache::cache::SkinStore;
use skincache::config::Config;
use skincache::overlay::{OverlayError, OverlayFetcher};
use skincache::sync::{SyncEngine, SyncProgress};
use skincache::view::WardrobeView;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Resolve the API key: environment first, then the OS keychain.
fn resolve_api_key() -> Option<String> {
    std::env::var("GW2_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| ApiKeyStore::get().ok())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    let cache_dir = config.cache_dir()?;

    let mut store =
        SkinStore::open(&cache_dir).context("Failed to open the local skin cache")?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--clear-cache" {
        store.clear().context("Failed to clear the skin cache")?;
        info!("Skin cache cleared");
        return Ok(());
    }

    if store.is_empty() {
        info!("Cache is empty, downloading the full skin database");
    } else {
        info!(cached = store.len(), "Checking for new skins");
    }

    let client = CatalogClient::new(config.lang.clone())?;
    let mut engine = SyncEngine::new(client.clone());
    if let Some(batch_size) = config.batch_size {
        engine = engine.with_batch_size(batch_size);
    }

    // Log progress from the background of the run
    let (tx, mut rx) = tokio::sync::mpsc::channel::<SyncProgress>(32);
    let progress_task = tokio::spawn(async move {
        while let Some(p) = rx.recv().await {
            info!(current = p.current, total = p.total, phase = p.phase, "Sync progress");
        }
    });

    let report = engine
        .run(&mut store, Some(tx))
        .await
        .context("Catalog sync failed, nothing to show - please retry")?;
    let _ = progress_task.await;

    for failure in &report.failed_batches {
        warn!(
            ids = failure.ids.len(),
            error = %failure.error,
            "A batch failed this run; its skins will be fetched next time"
        );
    }

    // Overlay refresh is independent of the catalog sync and never clobbers
    // cached unlock data on a transient failure
    let fetcher = OverlayFetcher::new(client, cache_dir);
    let unlocked = match resolve_api_key() {
        Some(api_key) => match fetcher.refresh(&api_key).await {
            Ok(snapshot) => {
                if let Err(e) = ApiKeyStore::store(&api_key) {
                    warn!(error = %e, "Could not store the API key in the keychain");
                }
                snapshot.unlocked
            }
            Err(e @ OverlayError::Auth) => {
                error!("{e}");
                fetcher.load_persisted().map(|s| s.unlocked).unwrap_or_default()
            }
            Err(e) => {
                warn!("{e}");
                fetcher.load_persisted().map(|s| s.unlocked).unwrap_or_default()
            }
        },
        None => {
            info!("No API key configured, unlock data unavailable");
            fetcher.load_persisted().map(|s| s.unlocked).unwrap_or_default()
        }
    };

    let view = WardrobeView::new(report.skins, unlocked);
    println!(
        "{} skins cached, {} unlocked",
        view.skins().len(),
        view.unlocked_count()
    );
    if let Some(suggestion) = view.random_locked() {
        println!("Still locked: {} ({})", suggestion.name, suggestion.rarity);
    }

    Ok(())
}
