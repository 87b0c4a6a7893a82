// Background polling loop: sequential refresh of every tracked product
use crate::model::CatalogError;
use crate::scraper::Scraper;
use crate::tracker::ProductTracker;
use crate::utils::uniform_delay;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::time::sleep;
use tracing::{info, warn};

/// Default pacing between two products in a cycle, to throttle the
/// outbound request rate rather than to protect shared state.
pub const ITEM_DELAY_RANGE: (f64, f64) = (5.0, 10.0);

pub struct Poller<S> {
    pub tracker: Arc<ProductTracker<S>>,
    pub interval: Duration,
    pub cooldown: Duration,
    pub item_delay_min: f64,
    pub item_delay_max: f64,
    pub refresh_notify: Arc<Notify>,
    pub shutdown: watch::Receiver<bool>,
}

impl<S: Scraper> Poller<S> {
    /// Runs until the shutdown signal flips. Each turn refreshes every
    /// product, then waits for the interval timer or a manual refresh.
    /// A cycle that aborts pauses the loop for the cooldown instead of
    /// killing it.
    pub async fn run(mut self) {
        info!("polling loop started");
        loop {
            let cycle = self.run_cycle().await;
            match cycle {
                Ok(refreshed) => info!(refreshed, "poll cycle complete"),
                Err(e) => {
                    warn!(error = %e, cooldown = ?self.cooldown, "poll cycle aborted, cooling down");
                    tokio::select! {
                        _ = sleep(self.cooldown) => {}
                        _ = self.shutdown.changed() => {
                            info!("shutdown requested, polling loop stopped");
                            return;
                        }
                    }
                }
            }

            tokio::select! {
                _ = sleep(self.interval) => {
                    info!("poll interval elapsed");
                }
                _ = self.refresh_notify.notified() => {
                    info!("manual refresh requested");
                }
                _ = self.shutdown.changed() => {
                    info!("shutdown requested, polling loop stopped");
                    return;
                }
            }
        }
    }

    /// One pass over the catalog. A product whose fetch fails is logged
    /// and skipped; storage trouble affects every remaining product, so it
    /// aborts the cycle instead.
    pub async fn run_cycle(&self) -> Result<usize, CatalogError> {
        let ids = self.tracker.product_ids().await;
        info!(products = ids.len(), "starting poll cycle");

        let mut refreshed = 0;
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                sleep(uniform_delay(self.item_delay_min, self.item_delay_max)).await;
            }
            match self.tracker.refresh(id).await {
                Ok(product) => {
                    info!(id = %product.id, price = product.current_price, "product refreshed");
                    refreshed += 1;
                }
                Err(
                    e @ (CatalogError::Storage(_)
                    | CatalogError::Snapshot(_)
                    | CatalogError::Io(_)),
                ) => return Err(e),
                Err(e) => {
                    warn!(id = %id, error = %e, "refresh failed, moving on");
                }
            }
        }
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FetchError;
    use crate::parser::ListingParser;
    use crate::scraper::{FetchPipeline, RetryPolicy};
    use crate::storage::{CsvHistoryStore, ProductCatalog};
    use std::fs;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;
    use tokio::time::timeout;

    const PAGE: &str = r#"
        <span id="productTitle">Widget Pro</span>
        <span class="a-offscreen">$100.00</span>
    "#;

    const UNAVAILABLE_PAGE: &str = r#"
        <div id="availability">Currently unavailable.</div>
    "#;

    /// Serves good pages until `broken` flips; from then on one specific
    /// product id starts answering with an unavailable page.
    struct SelectiveScraper {
        bad_id: &'static str,
        broken: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl Scraper for SelectiveScraper {
        async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
            if self.broken.load(Ordering::SeqCst) && url.contains(self.bad_id) {
                Ok(UNAVAILABLE_PAGE.to_string())
            } else {
                Ok(PAGE.to_string())
            }
        }
    }

    fn test_tracker(
        tag: &str,
        bad_id: &'static str,
    ) -> (Arc<ProductTracker<SelectiveScraper>>, Arc<AtomicBool>) {
        let dir = std::env::temp_dir().join(format!(
            "price-sentry-poller-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let catalog = ProductCatalog::load(dir.join("products.json")).unwrap();
        let history = CsvHistoryStore::new(&dir).unwrap();
        let broken = Arc::new(AtomicBool::new(false));
        let pipeline = FetchPipeline::new(
            SelectiveScraper {
                bad_id,
                broken: broken.clone(),
            },
            ListingParser::new(),
            RetryPolicy {
                max_attempts: 2,
                backoff_min_seconds: 0.0,
                backoff_max_seconds: 0.0,
            },
        );
        let tracker = Arc::new(ProductTracker::new(
            Arc::new(Mutex::new(catalog)),
            history,
            pipeline,
        ));
        (tracker, broken)
    }

    fn test_poller(
        tracker: Arc<ProductTracker<SelectiveScraper>>,
        shutdown: watch::Receiver<bool>,
    ) -> Poller<SelectiveScraper> {
        Poller {
            tracker,
            interval: Duration::from_secs(3600),
            cooldown: Duration::from_secs(3600),
            item_delay_min: 0.0,
            item_delay_max: 0.0,
            refresh_notify: Arc::new(Notify::new()),
            shutdown,
        }
    }

    #[tokio::test]
    async fn cycle_refreshes_every_tracked_product() {
        let (tracker, _broken) = test_tracker("all-good", "NONE");
        tracker
            .track("https://example.com/dp/B0AAA11111", None)
            .await
            .unwrap();
        tracker
            .track("https://example.com/dp/B0BBB22222", None)
            .await
            .unwrap();

        let (_tx, rx) = watch::channel(false);
        let poller = test_poller(tracker.clone(), rx);
        assert_eq!(poller.run_cycle().await.unwrap(), 2);

        let report = tracker.price_report("B0AAA11111").await.unwrap();
        assert_eq!(report.history.len(), 2);
    }

    #[tokio::test]
    async fn one_failing_product_does_not_stop_the_cycle() {
        let (tracker, broken) = test_tracker("isolated-failure", "B0AAA11111");
        tracker
            .track("https://example.com/dp/B0AAA11111", None)
            .await
            .unwrap();
        tracker
            .track("https://example.com/dp/B0BBB22222", None)
            .await
            .unwrap();

        // B0AAA11111 goes out of stock between cycles
        broken.store(true, Ordering::SeqCst);

        let (_tx, rx) = watch::channel(false);
        let poller = test_poller(tracker.clone(), rx);
        assert_eq!(poller.run_cycle().await.unwrap(), 1);

        // the healthy product still got its fresh sample
        let healthy = tracker.price_report("B0BBB22222").await.unwrap();
        assert_eq!(healthy.history.len(), 2);
        let unavailable = tracker.price_report("B0AAA11111").await.unwrap();
        assert_eq!(unavailable.history.len(), 1);
    }

    #[tokio::test]
    async fn shutdown_signal_stops_the_loop() {
        let (tracker, _broken) = test_tracker("shutdown", "NONE");
        let (tx, rx) = watch::channel(false);
        let poller = test_poller(tracker, rx);
        let handle = tokio::spawn(poller.run());

        tx.send(true).unwrap();
        timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller did not stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn manual_refresh_triggers_another_cycle() {
        let (tracker, _broken) = test_tracker("manual-refresh", "NONE");
        tracker
            .track("https://example.com/dp/B0AAA11111", None)
            .await
            .unwrap();

        let (tx, rx) = watch::channel(false);
        let refresh_notify = Arc::new(Notify::new());
        let mut poller = test_poller(tracker.clone(), rx);
        poller.refresh_notify = refresh_notify.clone();
        let handle = tokio::spawn(poller.run());

        // first cycle runs immediately; nudge a second one and wait for
        // its sample to land before shutting down
        refresh_notify.notify_one();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let report = tracker.price_report("B0AAA11111").await.unwrap();
            if report.history.len() >= 3 {
                break;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "second cycle never ran"
            );
            tokio::time::sleep(Duration::from_millis(25)).await;
        }

        tx.send(true).unwrap();
        timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller did not stop on shutdown")
            .unwrap();
    }
}
