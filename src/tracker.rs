// Tracker: ties fetch pipeline, history store and catalog together
use crate::analyzer::forecast::DEFAULT_HORIZON;
use crate::analyzer::{Analyzer, AnalyzerImpl};
use crate::model::{
    CatalogError, NegotiationResponse, PricePoint, PriceSample, PriceStats, Product,
};
use crate::negotiator;
use crate::scraper::{FetchPipeline, Scraper};
use crate::storage::{CsvHistoryStore, ProductCatalog};
use crate::utils;

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Everything a caller wants to know about one product: metadata, full
/// history, aggregate stats and the near-term projection.
pub struct PriceReport {
    pub product: Product,
    pub history: Vec<PriceSample>,
    pub stats: Option<PriceStats>,
    pub forecast: Vec<PricePoint>,
}

pub struct ProductTracker<S> {
    catalog: Arc<Mutex<ProductCatalog>>,
    history: CsvHistoryStore,
    pipeline: FetchPipeline<S>,
    analyzer: AnalyzerImpl,
}

impl<S: Scraper> ProductTracker<S> {
    pub fn new(
        catalog: Arc<Mutex<ProductCatalog>>,
        history: CsvHistoryStore,
        pipeline: FetchPipeline<S>,
    ) -> Self {
        Self {
            catalog,
            history,
            pipeline,
            analyzer: AnalyzerImpl::new(),
        }
    }

    /// Starts tracking the product behind `url`: derives the id, fetches
    /// initial details, seeds the history file and stores the metadata.
    pub async fn track(
        &self,
        url: &str,
        floor_price: Option<f64>,
    ) -> Result<Product, CatalogError> {
        let id = utils::product_id_from_url(url)
            .ok_or_else(|| CatalogError::InvalidUrl(url.to_string()))?;
        if self.catalog.lock().await.contains(&id) {
            return Err(CatalogError::AlreadyTracked(id));
        }

        let details = self.pipeline.fetch(url).await?;
        let name = details
            .name
            .unwrap_or_else(|| utils::placeholder_name(&id));

        self.history.append(&id, details.price)?;
        let stats = self.stats_or_single(&id, details.price)?;

        let product = Product {
            id: id.clone(),
            url: url.to_string(),
            name,
            current_price: details.price,
            avg_price: stats.mean,
            max_price: stats.max,
            min_price: stats.min,
            floor_price,
            last_updated: Utc::now(),
        };

        let mut catalog = self.catalog.lock().await;
        catalog.insert(product.clone());
        catalog.save()?;
        info!(id = %product.id, name = %product.name, price = product.current_price, "tracking new product");
        Ok(product)
    }

    /// Re-fetches a tracked product, appends the fresh sample and updates
    /// the stored metadata. The previous name survives a page that no
    /// longer carries one.
    pub async fn refresh(&self, product_id: &str) -> Result<Product, CatalogError> {
        let (url, old_name, old_min) = {
            let catalog = self.catalog.lock().await;
            let product = catalog
                .get(product_id)
                .ok_or_else(|| CatalogError::UnknownProduct(product_id.to_string()))?;
            (product.url.clone(), product.name.clone(), product.min_price)
        };

        let details = self.pipeline.fetch(&url).await?;
        let name = details.name.unwrap_or(old_name);
        if details.price < old_min {
            info!(product_id, price = details.price, previous_min = old_min, "new lowest price observed");
        }

        self.history.append(product_id, details.price)?;
        let stats = self.stats_or_single(product_id, details.price)?;

        let mut catalog = self.catalog.lock().await;
        let product = catalog
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::UnknownProduct(product_id.to_string()))?;
        product.name = name;
        product.current_price = details.price;
        product.avg_price = stats.mean;
        product.max_price = stats.max;
        product.min_price = stats.min;
        product.last_updated = Utc::now();
        let updated = product.clone();
        catalog.save()?;
        Ok(updated)
    }

    /// History, stats and forecast for one tracked product.
    pub async fn price_report(&self, product_id: &str) -> Result<PriceReport, CatalogError> {
        let product = {
            let catalog = self.catalog.lock().await;
            catalog
                .get(product_id)
                .cloned()
                .ok_or_else(|| CatalogError::UnknownProduct(product_id.to_string()))?
        };
        let history = self.history.load(product_id)?;
        let stats = self.analyzer.aggregate(&history);
        let forecast = self.analyzer.forecast(&history, DEFAULT_HORIZON);
        Ok(PriceReport {
            product,
            history,
            stats,
            forecast,
        })
    }

    /// Answers a user offer against the product's current listed price.
    /// The decision itself is pure; the activity trace lands in the log.
    pub async fn negotiate(
        &self,
        product_id: &str,
        offer: f64,
    ) -> Result<NegotiationResponse, CatalogError> {
        let catalog = self.catalog.lock().await;
        let product = catalog
            .get(product_id)
            .ok_or_else(|| CatalogError::UnknownProduct(product_id.to_string()))?;

        let listed = product.current_price;
        let floor = product
            .floor_price
            .unwrap_or_else(|| negotiator::default_floor(listed));
        let response = negotiator::negotiate(listed, floor, offer);
        info!(
            product_id,
            offer,
            listed_price = listed,
            floor_price = floor,
            outcome = %response,
            "negotiation handled"
        );
        Ok(response)
    }

    pub async fn product_ids(&self) -> Vec<String> {
        self.catalog.lock().await.ids()
    }

    fn stats_or_single(&self, product_id: &str, price: f64) -> Result<PriceStats, CatalogError> {
        Ok(self.history.aggregate(product_id)?.unwrap_or(PriceStats {
            mean: price,
            max: price,
            min: price,
        }))
    }
}
