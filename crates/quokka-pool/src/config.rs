//! Provider configuration
//!
//! Endpoint locations, timeouts, cache lifetime and retry policies used by
//! `PoolMetricsProvider`. Values come from the environment (see [`crate::env`])
//! and can be overridden with the builder-style setters.

use crate::env::{self, process_env};
use crate::error::{PoolError, Result};
use crate::retry::RetryPolicy;
use quokka_constants::{
    DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POOL_ID, DEFAULT_POOL_INFO_PATH,
    POOL_CACHE_TTL_SECS, POOL_ID_QUERY_PARAM,
};
use reqwest::Url;
use std::time::Duration;

/// Configuration for the pool metrics provider
#[derive(Debug, Clone, PartialEq)]
pub struct PoolProviderConfig {
    /// Base URL of the pool monitoring service
    pub base_url: String,
    /// Pool-info path relative to `base_url`
    pub pool_info_path: String,
    /// Full URL of the dynamic-info endpoint, if the deployment has one
    pub dynamic_info_url: Option<String>,
    /// Pool reported when the caller names none
    pub default_pool_id: String,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Lifetime of cached metrics
    pub cache_ttl: Duration,
    pub pool_info_retry: RetryPolicy,
    pub dynamic_info_retry: RetryPolicy,
}

impl Default for PoolProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pool_info_path: DEFAULT_POOL_INFO_PATH.to_string(),
            dynamic_info_url: None,
            default_pool_id: DEFAULT_POOL_ID.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(POOL_CACHE_TTL_SECS),
            pool_info_retry: RetryPolicy::pool_info(),
            dynamic_info_retry: RetryPolicy::dynamic_info(),
        }
    }
}

impl PoolProviderConfig {
    /// Create configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(&process_env)
    }

    /// Create configuration from an arbitrary key/value lookup
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: env::pool::base_url_with(lookup),
            pool_info_path: env::pool::pool_info_path_with(lookup),
            dynamic_info_url: env::pool::dynamic_info_url_with(lookup),
            default_pool_id: env::pool::pool_id_with(lookup),
            request_timeout: Duration::from_secs(env::timeouts::http_request_seconds_with(lookup)),
            ..Self::default()
        }
    }

    /// Set base URL
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set pool-info path
    pub fn with_pool_info_path<S: Into<String>>(mut self, path: S) -> Self {
        self.pool_info_path = path.into();
        self
    }

    /// Set dynamic-info endpoint URL
    pub fn with_dynamic_info_url<S: Into<String>>(mut self, url: S) -> Self {
        self.dynamic_info_url = Some(url.into());
        self
    }

    /// Set default pool id
    pub fn with_default_pool_id<S: Into<String>>(mut self, pool_id: S) -> Self {
        self.default_pool_id = pool_id.into();
        self
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set cache TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set retry policy of the pool-info endpoint
    pub fn with_pool_info_retry(mut self, policy: RetryPolicy) -> Self {
        self.pool_info_retry = policy;
        self
    }

    /// Set retry policy of the dynamic-info endpoint
    pub fn with_dynamic_info_retry(mut self, policy: RetryPolicy) -> Self {
        self.dynamic_info_retry = policy;
        self
    }

    /// URL of the pool-info endpoint for `pool_id`
    pub fn pool_info_url(&self, pool_id: &str) -> Result<Url> {
        let endpoint = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.pool_info_path.trim_start_matches('/')
        );
        with_pool_id(&endpoint, pool_id)
    }

    /// URL of the dynamic-info endpoint for `pool_id`
    pub fn dynamic_info_url(&self, pool_id: &str) -> Result<Url> {
        let endpoint = self
            .dynamic_info_url
            .as_deref()
            .ok_or_else(|| PoolError::config("dynamic-info URL is not configured"))?;
        with_pool_id(endpoint, pool_id)
    }
}

fn with_pool_id(endpoint: &str, pool_id: &str) -> Result<Url> {
    Url::parse_with_params(endpoint, &[(POOL_ID_QUERY_PARAM, pool_id)])
        .map_err(|e| PoolError::config(format!("invalid endpoint URL '{endpoint}': {e}")))
}
