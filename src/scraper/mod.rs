// Scraper module: HTTP fetch layer and the retry pipeline on top of it.

pub mod fetcher;
pub mod retry;
pub mod traits;

pub use fetcher::ScraperImpl;
pub use retry::{FetchPipeline, RetryPolicy};
pub use traits::Scraper;
