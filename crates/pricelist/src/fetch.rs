//! Single page fetching with bounded retry

use crate::config::RetryPolicy;
use crate::error::Error;
use crate::observer::FetchObserver;
use pricelist_core::catalog::PricePage;
use reqwest::StatusCode;
use std::time::Duration;

/// Longest error body kept in messages
const MAX_BODY_LEN: usize = 500;

/// Why one attempt at fetching a page failed
///
/// Status and transport failures are retried the same way; throttling only
/// changes the log message. A body that is not a page is not retried since
/// asking again returns the same body.
#[derive(thiserror::Error, Debug)]
pub enum AttemptError {
    #[error("HTTP 429 Too Many Requests")]
    Throttled,

    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid page body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl AttemptError {
    pub fn is_throttled(&self) -> bool {
        matches!(self, AttemptError::Throttled)
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, AttemptError::Decode(_))
    }
}

/// Create the HTTP client shared by every page request
pub fn create_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pricelist/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Client(e.to_string()))
}

pub struct PageFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl PageFetcher {
    pub fn new(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetch and decode one page, retrying with exponential backoff
    ///
    /// Every failed attempt is followed by a wait of `factor ^ attempt` units,
    /// the last one included (2, 4, 8, 16 and 32 seconds by default). Fails
    /// with [`Error::FetchExhausted`] once `max_attempts` attempts have failed,
    /// or right away with [`Error::InvalidPage`] when the body is not a page.
    pub async fn fetch(&self, url: &str, observer: &dyn FetchObserver) -> Result<PricePage, Error> {
        let mut last_error = None;

        for attempt in 1..=self.policy.max_attempts {
            observer.fetching(url, attempt);

            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(err) if !err.is_retryable() => {
                    return Err(Error::InvalidPage {
                        url: url.to_string(),
                        message: err.to_string(),
                    });
                }
                Err(err) => {
                    let wait = self.policy.delay(attempt);
                    if attempt < self.policy.max_attempts {
                        observer.retrying(url, attempt, &err, wait);
                    }
                    tokio::time::sleep(wait).await;
                    last_error = Some(err);
                }
            }
        }

        Err(Error::FetchExhausted {
            url: url.to_string(),
            attempts: self.policy.max_attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<PricePage, AttemptError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Throttled);
        }
        if status != StatusCode::OK {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_BODY_LEN {
                let cut = (0..=MAX_BODY_LEN)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(AttemptError::Transport)?;
        serde_json::from_slice::<PricePage>(&body).map_err(AttemptError::Decode)
    }
}
