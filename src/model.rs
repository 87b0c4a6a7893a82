// Core structs: Product, PriceSample, PriceStats + error taxonomy
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub url: String,
    pub name: String,
    pub current_price: f64,
    pub avg_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    pub floor_price: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

/// One observed (timestamp, price) pair. Immutable once written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

/// One projected point of a price forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Fields pulled off a live product page. `name` stays optional; callers
/// substitute a placeholder derived from the product id.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetails {
    pub name: Option<String>,
    pub price: f64,
}

/// Outcome of reading one parsed document. Unavailability dominates:
/// an out-of-stock marker wins over any price markup on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Listed(ListingDetails),
    Unavailable,
    FieldNotFound(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationResponse {
    AcceptListed { price: f64 },
    AcceptOffer { price: f64 },
    Counter { price: f64 },
    Reject { floor: f64 },
}

impl std::fmt::Display for NegotiationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AcceptListed { price } => {
                write!(f, "accepted at the listed price of {price:.2}")
            }
            Self::AcceptOffer { price } => write!(f, "offer of {price:.2} accepted"),
            Self::Counter { price } => write!(f, "counter-offer of {price:.2}"),
            Self::Reject { floor } => {
                write!(f, "offer rejected, best available price is {floor:.2}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("product is currently unavailable or out of stock")]
    Unavailable,
    #[error("could not locate {0} on the page")]
    FieldNotFound(&'static str),
    #[error("transient network failure: {0}")]
    Transient(String),
    #[error("gave up after {0} attempts")]
    RetriesExhausted(u32),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed history row: {0}")]
    Csv(#[from] csv::Error),
    #[error("bad timestamp in history: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("bad price in history: {0}")]
    Price(#[from] std::num::ParseFloatError),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not a recognized product url: {0}")]
    InvalidUrl(String),
    #[error("product {0} is already tracked")]
    AlreadyTracked(String),
    #[error("product {0} is not tracked")]
    UnknownProduct(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
