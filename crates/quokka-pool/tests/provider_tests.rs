//! Tests for pool metrics provider

use async_trait::async_trait;
use quokka_pool::{
    PoolError, PoolInfoEnvelope, PoolMetricsProvider, PoolProviderConfig, PoolSource, RawPoolMetric,
    RawTokenInfo, RetryPolicy, TtlCache,
};
use reqwest::Url;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::advance;

type Respond = Box<dyn Fn(usize) -> quokka_pool::Result<PoolInfoEnvelope> + Send + Sync>;

/// In-memory source answering with a per-call closure
struct FakeSource {
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    respond: Respond,
}

impl FakeSource {
    fn new(respond: impl Fn(usize) -> quokka_pool::Result<PoolInfoEnvelope> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PoolSource for FakeSource {
    async fn fetch_envelope(&self, url: &Url) -> quokka_pool::Result<PoolInfoEnvelope> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.urls.lock().unwrap().push(url.to_string());
        (self.respond)(n)
    }
}

fn raw_p1() -> RawPoolMetric {
    RawPoolMetric {
        pool_id: Some("P1".to_string()),
        token_a: Some(RawTokenInfo::new("A", "mA", 0)),
        token_b: Some(RawTokenInfo::new("B", "mB", 0)),
        price: Some(1.5),
        fee_rate: Some(0.0025),
        tvl: Some(1000.0),
        ..Default::default()
    }
}

fn ok_p1(_: usize) -> quokka_pool::Result<PoolInfoEnvelope> {
    Ok(PoolInfoEnvelope::new(raw_p1()))
}

fn config() -> PoolProviderConfig {
    PoolProviderConfig::default()
        .with_base_url("http://pools.test")
        .with_dynamic_info_url("http://pools.test/dynamic")
}

fn provider(source: Arc<FakeSource>, config: PoolProviderConfig) -> PoolMetricsProvider {
    let cache = Arc::new(TtlCache::new(config.cache_ttl));
    PoolMetricsProvider::new(config, source, cache)
}

#[tokio::test(start_paused = true)]
async fn test_second_call_within_ttl_is_served_from_cache() {
    let source = FakeSource::new(ok_p1);
    let provider = provider(source.clone(), config());

    let first = provider.get_pool_info("P1").await.unwrap();
    advance(Duration::from_secs(30)).await;
    let second = provider.get_pool_info("P1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(source.calls(), 1);
    assert_eq!(
        source.urls(),
        vec!["http://pools.test/pool-monitoring/info?poolId=P1".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_call_after_ttl_fetches_again() {
    let source = FakeSource::new(ok_p1);
    let provider = provider(source.clone(), config());

    provider.get_pool_info("P1").await.unwrap();
    advance(Duration::from_secs(59)).await;
    provider.get_pool_info("P1").await.unwrap();
    assert_eq!(source.calls(), 1);

    advance(Duration::from_secs(2)).await;
    provider.get_pool_info("P1").await.unwrap();
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_missing_price_fails_validation_and_caches_nothing() {
    let source = FakeSource::new(|_| {
        Ok(PoolInfoEnvelope::new(RawPoolMetric {
            token_a: Some(RawTokenInfo::new("A", "mA", 0)),
            ..Default::default()
        }))
    });
    let provider = provider(source.clone(), config());

    let err = provider.get_pool_info("P1").await.unwrap_err();
    assert!(matches!(err, PoolError::Validation { .. }));
    // validation is not retried
    assert_eq!(source.calls(), 1);
    assert!(provider.cache().is_empty().await);

    let _ = provider.get_pool_info("P1").await;
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_missing_data_field_is_validation_error() {
    let source = FakeSource::new(|_| Ok(PoolInfoEnvelope::default()));
    let provider = provider(source, config());

    let err = provider.get_pool_info("P1").await.unwrap_err();
    assert!(matches!(err, PoolError::Validation { ref field, .. } if field == "data"));
}

#[tokio::test(start_paused = true)]
async fn test_transient_server_errors_are_retried() {
    let source = FakeSource::new(|n| {
        if n < 3 {
            Err(PoolError::from_status(503, "http://pools.test"))
        } else {
            ok_p1(n)
        }
    });
    let provider = provider(source.clone(), config());

    let metric = provider.get_pool_info("P1").await.unwrap();
    assert_eq!(metric.pool_id, "P1");
    assert_eq!(source.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_is_single_attempt() {
    let source = FakeSource::new(|_| Err(PoolError::from_status(404, "http://pools.test")));
    let provider = provider(source.clone(), config());

    let err = provider.get_pool_info("P1").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_formatted_report_degrades_to_unavailable_message() {
    let source = FakeSource::new(|_| Err(PoolError::network("connection refused")));
    let provider = provider(source.clone(), config());

    let report = provider.get_formatted_pool_report("P1").await;
    assert_eq!(report, "Unable to fetch pool dynamic information.");
    assert_eq!(source.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_formatted_report_renders_metric() {
    let source = FakeSource::new(ok_p1);
    let provider = provider(source, config());

    let report = provider.get_formatted_pool_report("P1").await;
    assert!(report.starts_with("Pool Info:\n- Pool ID: P1\n"));
    assert!(report.contains("- Fee Rate: 0.25%\n"));
    assert!(report.contains("- TVL: $1000\n"));
}

#[tokio::test(start_paused = true)]
async fn test_default_pool_report_uses_configured_pool() {
    let source = FakeSource::new(ok_p1);
    let provider = provider(source.clone(), config().with_default_pool_id("P1"));

    let report = provider.get_default_pool_report().await;
    assert!(report.contains("- Pool ID: P1"));
    assert!(source.urls()[0].ends_with("?poolId=P1"));
}

#[tokio::test(start_paused = true)]
async fn test_dynamic_info_has_own_cache_namespace() {
    let source = FakeSource::new(ok_p1);
    let provider = provider(source.clone(), config());

    provider.get_pool_info("P1").await.unwrap();
    provider.get_dynamic_pool_info("P1").await.unwrap();
    provider.get_dynamic_pool_info("P1").await.unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(source.urls()[1], "http://pools.test/dynamic?poolId=P1");
    assert!(provider.cache().has("pool-info-P1").await);
    assert!(provider.cache().has("pool-dynamic-info-P1").await);
}

#[tokio::test(start_paused = true)]
async fn test_dynamic_info_applies_same_validation() {
    let source = FakeSource::new(|_| {
        Ok(PoolInfoEnvelope::new(RawPoolMetric {
            token_b: None,
            ..raw_p1()
        }))
    });
    let provider = provider(source, config());

    let err = provider.get_dynamic_pool_info("P1").await.unwrap_err();
    assert!(matches!(err, PoolError::Validation { ref field, .. } if field == "tokenB"));
}

#[tokio::test(start_paused = true)]
async fn test_window_with_only_min_price_is_accepted() {
    let source = FakeSource::new(|_| {
        Ok(PoolInfoEnvelope::new(RawPoolMetric {
            price_min_24h: Some(1.2),
            ..raw_p1()
        }))
    });
    let provider = provider(source.clone(), config());

    let metric = provider.get_pool_info("P1").await.unwrap();
    assert_eq!(metric.stats_24h.price_min, 1.2);
    assert_eq!(metric.stats_24h.price_max, 0.0);
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dynamic_info_retry_uses_shorter_delay() {
    let source = FakeSource::new(|_| Err(PoolError::network("timeout")));
    let provider = provider(source.clone(), config());
    let started = tokio::time::Instant::now();

    let _ = provider.get_dynamic_pool_info("P1").await;
    assert_eq!(source.calls(), 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(2000));
    assert!(elapsed < Duration::from_millis(3000));
}

#[tokio::test]
async fn test_dynamic_info_without_url_is_config_error() {
    let source = FakeSource::new(ok_p1);
    let provider = provider(source.clone(), PoolProviderConfig::default());

    let err = provider.get_dynamic_pool_info("P1").await.unwrap_err();
    assert!(matches!(err, PoolError::Config { .. }));
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_custom_retry_policy_is_honoured() {
    let source = FakeSource::new(|_| Err(PoolError::from_status(500, "http://pools.test")));
    let provider = provider(
        source.clone(),
        config().with_pool_info_retry(RetryPolicy::fixed(5, Duration::from_millis(10))),
    );

    let err = provider.get_pool_info("P1").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(source.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_shared_cache_serves_other_provider() {
    let cache = Arc::new(TtlCache::default());
    let first_source = FakeSource::new(ok_p1);
    let second_source = FakeSource::new(ok_p1);
    let first = PoolMetricsProvider::new(config(), first_source.clone(), Arc::clone(&cache));
    let second = PoolMetricsProvider::new(config(), second_source.clone(), Arc::clone(&cache));

    first.get_pool_info("P1").await.unwrap();
    second.get_pool_info("P1").await.unwrap();

    assert_eq!(first_source.calls(), 1);
    assert_eq!(second_source.calls(), 0);
}
