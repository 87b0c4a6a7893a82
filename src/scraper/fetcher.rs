use crate::model::FetchError;
use crate::scraper::traits::Scraper;

use rand::seq::IndexedRandom;
use reqwest::Client;
use std::time::Duration;

/// Pool of browser identities, one drawn per attempt so consecutive
/// attempts do not present the same fingerprint.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
];

pub struct ScraperImpl {
    client: Client,
}

impl ScraperImpl {
    pub fn new(request_timeout: Duration) -> Self {
        let client = Client::builder().timeout(request_timeout).build().unwrap();

        Self { client }
    }

    fn random_user_agent() -> &'static str {
        USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let user_agent = Self::random_user_agent();

        let response = self
            .client
            .get(url)
            .header("User-Agent", user_agent)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Connection", "keep-alive")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Transient(format!(
                "request failed with status {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_pool_is_plausible() {
        for _ in 0..16 {
            let ua = ScraperImpl::random_user_agent();
            assert!(ua.starts_with("Mozilla/5.0"));
        }
    }
}
