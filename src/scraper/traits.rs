use crate::model::FetchError;

/// Document-fetching collaborator: one attempt, raw page body on success.
#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}
