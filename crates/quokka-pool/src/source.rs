//! Remote sources of pool data
//!
//! `PoolSource` is the single network seam of the provider: one call, one
//! request, one decoded envelope. Retry, validation and caching live above it.

use crate::error::{PoolError, Result};
use async_trait::async_trait;
use quokka_types::PoolInfoEnvelope;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

/// Performs a single fetch of a pool envelope
#[async_trait]
pub trait PoolSource: Send + Sync {
    /// Fetch and decode the envelope at `url`
    ///
    /// Non-2xx statuses map to `Server`/`Client`, transport failures to
    /// `Network`, undecodable bodies to `Malformed`.
    async fn fetch_envelope(&self, url: &Url) -> Result<PoolInfoEnvelope>;
}

/// `PoolSource` over HTTP GET
#[derive(Debug, Clone)]
pub struct HttpPoolSource {
    client: Client,
}

impl HttpPoolSource {
    /// Create a source whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PoolError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PoolSource for HttpPoolSource {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_envelope(&self, url: &Url) -> Result<PoolInfoEnvelope> {
        debug!("Fetching pool envelope");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PoolError::from_status(status.as_u16(), url.as_str()));
        }

        let body = response.bytes().await?;
        let envelope = serde_json::from_slice::<PoolInfoEnvelope>(&body)?;
        debug!(bytes = body.len(), has_data = envelope.data.is_some(), "Decoded pool envelope");
        Ok(envelope)
    }
}
