// Product catalog: tracked-product metadata with a JSON snapshot on disk
use crate::model::{CatalogError, Product};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Explicit store object for tracked products, passed to the polling and
/// request contexts instead of living in process-global state. The map is
/// authoritative in memory; `save` mirrors it to a JSON snapshot so a
/// restart picks up where the last run stopped.
pub struct ProductCatalog {
    products: BTreeMap<String, Product>,
    snapshot_path: PathBuf,
}

impl ProductCatalog {
    /// Opens the catalog, restoring the snapshot when one exists.
    pub fn load(snapshot_path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let snapshot_path = snapshot_path.as_ref().to_path_buf();
        let products = if snapshot_path.exists() {
            serde_json::from_str(&fs::read_to_string(&snapshot_path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            products,
            snapshot_path,
        })
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    pub fn get_mut(&mut self, product_id: &str) -> Option<&mut Product> {
        self.products.get_mut(product_id)
    }

    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn ids(&self) -> Vec<String> {
        self.products.keys().cloned().collect()
    }

    pub fn save(&self) -> Result<(), CatalogError> {
        fs::write(
            &self.snapshot_path,
            serde_json::to_string_pretty(&self.products)?,
        )?;
        Ok(())
    }
}
