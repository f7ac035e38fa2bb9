//! Fetch contract between the synchroniser and the remote catalog service.
//!
//! The synchroniser only ever talks to a [`ProducerFetcher`]; the concrete
//! [`HttpFetcher`] does plain blocking-free HTTP with no retry or backoff
//! (network failures propagate to the run), and tests substitute the
//! generated `MockProducerFetcher` so no network is involved.

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;

/// Remote side of a synchronisation run.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait ProducerFetcher: Send + Sync {
    /// Fetch the current producer index document as text.
    async fn fetch_index(&self) -> Result<String, FetchError>;

    /// Fetch one producer's payload document from its `href`.
    async fn fetch_payload(&self, href: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher against the fixed index URL.
pub struct HttpFetcher {
    client: reqwest::Client,
    index_url: String,
}

impl HttpFetcher {
    pub fn new(index_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            index_url: index_url.into(),
        }
    }
}

#[async_trait]
impl ProducerFetcher for HttpFetcher {
    async fn fetch_index(&self) -> Result<String, FetchError> {
        debug!(url = %self.index_url, "fetching producer index");
        let response = self.client.get(&self.index_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "index request to {} returned {status}",
                self.index_url
            )
            .into());
        }
        Ok(response.text().await?)
    }

    async fn fetch_payload(&self, href: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url = href, "fetching producer payload");
        let response = self.client.get(href).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("payload request to {href} returned {status}").into());
        }
        Ok(response.bytes().await?.to_vec())
    }
}
