//! Pool metrics provider
//!
//! Cache-first access to pool metrics: a cache hit returns immediately, a
//! miss runs the retry-wrapped fetch, validates the envelope and caches the
//! result. `get_formatted_pool_report` is the degrading boundary for callers
//! that only want text.

use crate::cache::TtlCache;
use crate::config::PoolProviderConfig;
use crate::error::{PoolError, Result};
use crate::format::format_pool_info;
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::source::{HttpPoolSource, PoolSource};
use crate::validation::validate_envelope;
use quokka_constants::{cache_keys, POOL_UNAVAILABLE_MESSAGE};
use quokka_types::PoolMetric;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Remote endpoints serving pool metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEndpoint {
    /// `{base_url}/{pool_info_path}?poolId=`
    PoolInfo,
    /// `{dynamic_info_url}?poolId=`
    DynamicInfo,
}

impl PoolEndpoint {
    /// Cache key of `pool_id` in this endpoint's namespace
    pub fn cache_key(self, pool_id: &str) -> String {
        match self {
            Self::PoolInfo => cache_keys::pool_info(pool_id),
            Self::DynamicInfo => cache_keys::dynamic_info(pool_id),
        }
    }
}

impl fmt::Display for PoolEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoolInfo => write!(f, "pool-info"),
            Self::DynamicInfo => write!(f, "dynamic-info"),
        }
    }
}

/// Fetches, caches and formats pool metrics
pub struct PoolMetricsProvider {
    config: PoolProviderConfig,
    source: Arc<dyn PoolSource>,
    cache: Arc<TtlCache<PoolMetric>>,
}

impl PoolMetricsProvider {
    /// Create a provider over an explicit source and shared cache
    pub fn new(
        config: PoolProviderConfig,
        source: Arc<dyn PoolSource>,
        cache: Arc<TtlCache<PoolMetric>>,
    ) -> Self {
        Self {
            config,
            source,
            cache,
        }
    }

    /// Create a provider that fetches over HTTP
    pub fn from_config(config: PoolProviderConfig, cache: Arc<TtlCache<PoolMetric>>) -> Result<Self> {
        let source = HttpPoolSource::new(config.request_timeout)?;
        Ok(Self::new(config, Arc::new(source), cache))
    }

    /// Create an HTTP provider configured from the environment with its own cache
    pub fn from_env() -> Result<Self> {
        let config = PoolProviderConfig::from_env();
        let cache = Arc::new(TtlCache::new(config.cache_ttl));
        Self::from_config(config, cache)
    }

    pub fn config(&self) -> &PoolProviderConfig {
        &self.config
    }

    /// Shared cache backing this provider
    pub fn cache(&self) -> &Arc<TtlCache<PoolMetric>> {
        &self.cache
    }

    /// Get metrics from the pool-info endpoint, cache first
    #[instrument(skip(self))]
    pub async fn get_pool_info(&self, pool_id: &str) -> Result<PoolMetric> {
        self.get_metric(PoolEndpoint::PoolInfo, pool_id).await
    }

    /// Get metrics from the dynamic-info endpoint, cache first
    ///
    /// Fails with `PoolError::Config` when no dynamic-info URL is configured.
    #[instrument(skip(self))]
    pub async fn get_dynamic_pool_info(&self, pool_id: &str) -> Result<PoolMetric> {
        self.get_metric(PoolEndpoint::DynamicInfo, pool_id).await
    }

    /// Render a metric as the plain-text report
    pub fn format_pool_info(&self, metric: &PoolMetric) -> String {
        format_pool_info(metric)
    }

    /// Formatted report for `pool_id`, or the unavailable message on any failure
    #[instrument(skip(self))]
    pub async fn get_formatted_pool_report(&self, pool_id: &str) -> String {
        match self.get_pool_info(pool_id).await {
            Ok(metric) => format_pool_info(&metric),
            Err(e) => {
                error!(pool_id, error = ?e, "Error fetching pool info");
                POOL_UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }

    /// Formatted report for the configured default pool
    pub async fn get_default_pool_report(&self) -> String {
        let pool_id = self.config.default_pool_id.clone();
        self.get_formatted_pool_report(&pool_id).await
    }

    async fn get_metric(&self, endpoint: PoolEndpoint, pool_id: &str) -> Result<PoolMetric> {
        if pool_id.trim().is_empty() {
            return Err(PoolError::validation("poolId", "pool id must not be empty"));
        }

        let key = endpoint.cache_key(pool_id);
        match self.cache.lookup(&key).await {
            Ok(metric) => {
                info!(pool_id, %endpoint, "Cache hit for pool data");
                return Ok(metric);
            }
            Err(PoolError::CacheMiss { .. }) => {
                debug!(pool_id, %endpoint, "Cache miss, fetching pool data");
            }
            Err(e) => return Err(e),
        }

        let (url, policy) = self.endpoint(endpoint, pool_id)?;
        info!(url = %url, %endpoint, "Fetching pool data");

        let executor = RetryExecutor::new(policy);
        let envelope = executor
            .execute(|| {
                let source = Arc::clone(&self.source);
                let url = url.clone();
                async move { source.fetch_envelope(&url).await }
            })
            .await?;

        let metric = validate_envelope(envelope)?;
        self.cache
            .set(key, metric.clone(), self.config.cache_ttl)
            .await;
        Ok(metric)
    }

    fn endpoint(&self, endpoint: PoolEndpoint, pool_id: &str) -> Result<(Url, RetryPolicy)> {
        match endpoint {
            PoolEndpoint::PoolInfo => Ok((
                self.config.pool_info_url(pool_id)?,
                self.config.pool_info_retry.clone(),
            )),
            PoolEndpoint::DynamicInfo => Ok((
                self.config.dynamic_info_url(pool_id)?,
                self.config.dynamic_info_retry.clone(),
            )),
        }
    }
}

impl fmt::Debug for PoolMetricsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolMetricsProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
