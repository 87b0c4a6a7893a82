// Durable price history: one append-only CSV per product id
use crate::analyzer::stats;
use crate::model::{PriceSample, PriceStats, StorageError};

use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Owns the `price_history_<id>.csv` files under the data directory.
/// Rows are `timestamp,price` with RFC 3339 timestamps, readable with any
/// spreadsheet tool. Rows are only ever appended.
pub struct CsvHistoryStore {
    data_dir: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn history_path(&self, product_id: &str) -> PathBuf {
        self.data_dir.join(format!("price_history_{product_id}.csv"))
    }

    /// Appends a sample stamped with the current time, creating the file
    /// (with header) on first write.
    pub fn append(&self, product_id: &str, price: f64) -> Result<(), StorageError> {
        self.append_at(product_id, Utc::now(), price)
    }

    pub fn append_at(
        &self,
        product_id: &str,
        timestamp: DateTime<Utc>,
        price: f64,
    ) -> Result<(), StorageError> {
        let path = self.history_path(product_id);
        let fresh = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        if fresh {
            writer.write_record(["timestamp", "price"])?;
        }
        writer.write_record([timestamp.to_rfc3339(), price.to_string()])?;
        writer.flush()?;
        Ok(())
    }

    /// All samples recorded for the product, in append order. A product
    /// with no history file simply has no samples yet.
    pub fn load(&self, product_id: &str) -> Result<Vec<PriceSample>, StorageError> {
        let path = self.history_path(product_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut samples = Vec::new();
        for record in reader.records() {
            let record = record?;
            let timestamp = DateTime::parse_from_rfc3339(record.get(0).unwrap_or_default())?
                .with_timezone(&Utc);
            let price: f64 = record.get(1).unwrap_or_default().parse()?;
            samples.push(PriceSample { timestamp, price });
        }
        Ok(samples)
    }

    /// Mean/max/min over the whole sequence; `None` when nothing has been
    /// recorded for the product.
    pub fn aggregate(&self, product_id: &str) -> Result<Option<PriceStats>, StorageError> {
        Ok(stats::aggregate(&self.load(product_id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_store(tag: &str) -> CsvHistoryStore {
        let dir = std::env::temp_dir().join(format!(
            "price-sentry-history-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        CsvHistoryStore::new(&dir).unwrap()
    }

    #[test]
    fn append_then_load_round_trips_in_order() {
        let store = test_store("round-trip");
        let start = Utc::now();
        store.append_at("B0TEST", start, 10.0).unwrap();
        store.append_at("B0TEST", start + Duration::days(1), 20.0).unwrap();
        store.append_at("B0TEST", start + Duration::days(2), 30.0).unwrap();

        let samples = store.load("B0TEST").unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].price, 10.0);
        assert_eq!(samples[2].price, 30.0);
        assert!(samples[0].timestamp < samples[1].timestamp);
    }

    #[test]
    fn aggregate_matches_the_recorded_samples() {
        let store = test_store("aggregate");
        for price in [10.0, 20.0, 30.0] {
            store.append("B0TEST", price).unwrap();
        }
        let stats = store.aggregate("B0TEST").unwrap().unwrap();
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.min, 10.0);
    }

    #[test]
    fn missing_product_has_no_samples_and_no_stats() {
        let store = test_store("missing");
        assert!(store.load("B0NOPE").unwrap().is_empty());
        assert!(store.aggregate("B0NOPE").unwrap().is_none());
    }

    #[test]
    fn history_file_is_headed_and_human_readable() {
        let store = test_store("header");
        store.append("B0TEST", 19.99).unwrap();
        let content = fs::read_to_string(store.history_path("B0TEST")).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("timestamp,price"));
        assert!(lines.next().unwrap().ends_with(",19.99"));
    }

    #[test]
    fn products_keep_separate_files() {
        let store = test_store("separate");
        store.append("B0AAA", 1.0).unwrap();
        store.append("B0BBB", 2.0).unwrap();
        assert_eq!(store.load("B0AAA").unwrap().len(), 1);
        assert_eq!(store.load("B0BBB").unwrap().len(), 1);
    }
}
