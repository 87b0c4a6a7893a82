// Storage module: durable price history and the product catalog snapshot.

pub mod catalog;
pub mod csv_history;

pub use catalog::ProductCatalog;
pub use csv_history::CsvHistoryStore;
