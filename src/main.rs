mod analyzer;
mod config;
mod model;
mod negotiator;
mod parser;
mod poller;
mod scraper;
mod storage;
mod tracker;
mod utils;

use config::load_config;
use model::CatalogError;
use parser::ListingParser;
use poller::{ITEM_DELAY_RANGE, Poller};
use scraper::{FetchPipeline, RetryPolicy, ScraperImpl};
use storage::{CsvHistoryStore, ProductCatalog};
use tracker::ProductTracker;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, watch};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Log details about any panic instead of dying silently
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {panic_info:?}");
    }));

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {e}");
            return;
        }
    };

    let history = match CsvHistoryStore::new(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize history store: {e}");
            return;
        }
    };

    let catalog = match ProductCatalog::load(Path::new(&config.data_dir).join("products.json")) {
        Ok(catalog) => Arc::new(Mutex::new(catalog)),
        Err(e) => {
            error!("Failed to load product catalog: {e}");
            return;
        }
    };

    let fetcher = ScraperImpl::new(Duration::from_secs(config.request_timeout_seconds));
    let pipeline = FetchPipeline::new(fetcher, ListingParser::new(), RetryPolicy::from_config(&config));
    let tracker = Arc::new(ProductTracker::new(catalog, history, pipeline));

    // Bring every configured product under tracking. Products restored
    // from the snapshot are already known and just get reported.
    for product_cfg in &config.products {
        match tracker.track(&product_cfg.url, product_cfg.floor_price).await {
            Ok(product) => info!(id = %product.id, name = %product.name, "now tracking"),
            Err(CatalogError::AlreadyTracked(id)) => info!(%id, "already tracked"),
            Err(e) => warn!(url = %product_cfg.url, error = %e, "could not start tracking"),
        }
    }

    let refresh_notify = Arc::new(Notify::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poller = Poller {
        tracker: tracker.clone(),
        interval: Duration::from_secs(config.poll_interval_seconds),
        cooldown: Duration::from_secs(config.cycle_cooldown_seconds),
        item_delay_min: ITEM_DELAY_RANGE.0,
        item_delay_max: ITEM_DELAY_RANGE.1,
        refresh_notify: refresh_notify.clone(),
        shutdown: shutdown_rx,
    };
    let poller_handle = tokio::spawn(poller.run());

    info!("price-sentry started");

    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Could not listen for shutdown signal, stopping now");
    }
    info!("Shutting down...");
    let _ = shutdown_tx.send(true);
    let _ = poller_handle.await;
}
