use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::api::{PetFetcher, PetId, PetRecord};
use crate::error::{PetlineageError, Result};

/// HTTP client for the pet base API.
///
/// Fetches one record per request from `GET {base_url}/pet/{id}`, with a
/// per-request timeout and bounded retry on transient server errors.
pub struct HttpPetFetcher {
    client: Client,
    base_url: String,
    max_retries: usize,
}

impl HttpPetFetcher {
    /// Create a new fetcher.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. "https://petbase.example.com/api"
    /// * `timeout` - per-request timeout
    /// * `max_retries` - retry attempts on 429/5xx responses
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// normal operation)
    pub fn new(base_url: impl Into<String>, timeout: Duration, max_retries: usize) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            max_retries,
        }
    }

    /// Single request, no retry.
    async fn fetch_once(&self, id: PetId) -> Result<PetRecord> {
        let url = format!("{}/pet/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PetlineageError::Fetch(format!("Network error for pet {id}: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(PetlineageError::Fetch(format!(
                "Pet API error {status} for pet {id}: {body}"
            )));
        }

        let record: PetRecord = response
            .json()
            .await
            .map_err(|e| PetlineageError::Fetch(format!("Failed to parse pet {id}: {e}")))?;

        Ok(record)
    }

    /// Whether a fetch error is worth retrying (rate limit or server error).
    fn is_retryable(err: &PetlineageError) -> bool {
        let msg = err.to_string();
        msg.contains("429")
            || msg.contains("500")
            || msg.contains("502")
            || msg.contains("503")
            || msg.contains("504")
    }

    async fn fetch_with_retry(&self, id: PetId) -> Result<PetRecord> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.fetch_once(id).await {
                Ok(record) => {
                    log::debug!(
                        "Fetched pet {} in {:?} (attempt {})",
                        id,
                        start.elapsed(),
                        attempt + 1
                    );
                    return Ok(record);
                }
                Err(e) if attempt < self.max_retries && Self::is_retryable(&e) => {
                    log::warn!("Retry {}/{} for pet {} after error: {}", attempt + 1, self.max_retries, id, e);
                    tokio::time::sleep(delay).await;
                    delay *= 2; // Exponential backoff
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl PetFetcher for HttpPetFetcher {
    async fn fetch(&self, id: PetId) -> Result<PetRecord> {
        self.fetch_with_retry(id).await
    }
}
