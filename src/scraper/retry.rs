// Fetch-with-retry: bounded attempts, random backoff, terminal short-circuit
use crate::config::AppConfig;
use crate::model::{Extraction, FetchError, ListingDetails};
use crate::parser::ListingParser;
use crate::scraper::traits::Scraper;
use crate::utils::uniform_delay;

use scraper::Html;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_min_seconds: f64,
    pub backoff_max_seconds: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_min_seconds: config.backoff_min_seconds,
            backoff_max_seconds: config.backoff_max_seconds,
        }
    }

    fn draw_backoff(&self) -> Duration {
        uniform_delay(self.backoff_min_seconds, self.backoff_max_seconds)
    }
}

/// What a single attempt produced, after extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Extracted(Extraction),
    Transient,
}

/// Terminal results of the retry loop. Retrying changes none of these:
/// an unavailable listing stays unavailable, a page without a price field
/// will not grow one, and an exhausted budget is spent.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminal {
    Listed(ListingDetails),
    Unavailable,
    FieldNotFound(&'static str),
    Exhausted { attempts: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryState {
    Attempting { attempt: u32 },
    Backoff { next_attempt: u32 },
    Done(Terminal),
}

/// Pure transition: classifies the attempt outcome against the budget.
/// `attempt` is zero-based.
pub fn advance(attempt: u32, outcome: AttemptOutcome, policy: &RetryPolicy) -> RetryState {
    match outcome {
        AttemptOutcome::Extracted(Extraction::Listed(details)) => {
            RetryState::Done(Terminal::Listed(details))
        }
        AttemptOutcome::Extracted(Extraction::Unavailable) => {
            RetryState::Done(Terminal::Unavailable)
        }
        AttemptOutcome::Extracted(Extraction::FieldNotFound(field)) => {
            RetryState::Done(Terminal::FieldNotFound(field))
        }
        AttemptOutcome::Transient => {
            let consumed = attempt + 1;
            if consumed >= policy.max_attempts {
                RetryState::Done(Terminal::Exhausted { attempts: consumed })
            } else {
                RetryState::Backoff {
                    next_attempt: consumed,
                }
            }
        }
    }
}

/// Drives the scraper and parser through the retry state machine.
pub struct FetchPipeline<S> {
    scraper: S,
    parser: ListingParser,
    policy: RetryPolicy,
}

impl<S: Scraper> FetchPipeline<S> {
    pub fn new(scraper: S, parser: ListingParser, policy: RetryPolicy) -> Self {
        Self {
            scraper,
            parser,
            policy,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<ListingDetails, FetchError> {
        let mut state = RetryState::Attempting { attempt: 0 };
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    info!(url, attempt = attempt + 1, "fetching product page");
                    let outcome = match self.scraper.fetch_page(url).await {
                        Ok(body) => {
                            let document = Html::parse_document(&body);
                            AttemptOutcome::Extracted(self.parser.extract(&document))
                        }
                        Err(FetchError::Transient(cause)) => {
                            warn!(url, attempt = attempt + 1, %cause, "attempt failed");
                            AttemptOutcome::Transient
                        }
                        Err(terminal) => return Err(terminal),
                    };
                    advance(attempt, outcome, &self.policy)
                }
                RetryState::Backoff { next_attempt } => {
                    sleep(self.policy.draw_backoff()).await;
                    RetryState::Attempting {
                        attempt: next_attempt,
                    }
                }
                RetryState::Done(terminal) => {
                    return match terminal {
                        Terminal::Listed(details) => Ok(details),
                        Terminal::Unavailable => Err(FetchError::Unavailable),
                        Terminal::FieldNotFound(field) => Err(FetchError::FieldNotFound(field)),
                        Terminal::Exhausted { attempts } => {
                            Err(FetchError::RetriesExhausted(attempts))
                        }
                    };
                }
            };
        }
    }
}
