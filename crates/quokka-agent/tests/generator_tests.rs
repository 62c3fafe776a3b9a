//! Tests for liquidity config generator

use async_trait::async_trait;
use quokka_agent::{ConfigGenerator, GeneratorError, LiquidityConfig, LlmClient};
use quokka_pool::{
    PoolError, PoolInfoEnvelope, PoolMetricsProvider, PoolProviderConfig, PoolSource,
    RawPoolMetric, RawTokenInfo, TtlCache,
};
use reqwest::Url;
use std::sync::{Arc, Mutex};

/// LLM double that records prompts and replies with a fixed answer
struct MockLlm {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    fn new(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, prompt: &str) -> quokka_agent::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

/// Source serving one fixed pool and recording the URLs it was asked for
struct StaticSource {
    available: bool,
    urls: Mutex<Vec<String>>,
}

impl StaticSource {
    fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            urls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PoolSource for StaticSource {
    async fn fetch_envelope(&self, url: &Url) -> quokka_pool::Result<PoolInfoEnvelope> {
        self.urls.lock().unwrap().push(url.to_string());
        if !self.available {
            return Err(PoolError::from_status(404, "http://pools.test"));
        }
        Ok(PoolInfoEnvelope::new(RawPoolMetric {
            pool_id: Some("TRUMP-SOL".to_string()),
            token_a: Some(RawTokenInfo::new("TRUMP", "mTRUMP", 6)),
            token_b: Some(RawTokenInfo::new("SOL", "mSOL", 9)),
            price: Some(0.27),
            fee_rate: Some(0.0025),
            ..Default::default()
        }))
    }
}

fn provider_with(source: Arc<StaticSource>) -> Arc<PoolMetricsProvider> {
    let config = PoolProviderConfig::default()
        .with_base_url("http://pools.test")
        .with_default_pool_id("TRUMP-SOL");
    Arc::new(PoolMetricsProvider::new(
        config,
        source,
        Arc::new(TtlCache::default()),
    ))
}

fn provider(available: bool) -> Arc<PoolMetricsProvider> {
    provider_with(StaticSource::new(available))
}

const GOOD_ANSWER: &str = "Based on the volatility:\n```json\n{\n  \"stepPercentage\": 5,\n  \"addLiquidityAmount\": 5,\n  \"minPrice\": 0.21,\n  \"maxPrice\": 0.32\n}\n```";

#[tokio::test]
async fn test_generates_config_from_fenced_answer() {
    let llm = MockLlm::new(GOOD_ANSWER);
    let generator = ConfigGenerator::new(provider(true), llm.clone()).unwrap();

    let generated = generator
        .generate("My wallet has 1200 TRUMP and 0.32 SOL.")
        .await
        .unwrap();

    assert_eq!(generated.config, LiquidityConfig::new(5.0, 5.0, 0.21, 0.32));
    assert_eq!(generated.action, "GENERATE_RAYDIUM_CLMM_CONFIG");
    assert_eq!(
        generated.text,
        "Configuration generated for Raydium CLMM pool.\n\nStep Percentage: 5%\nLiquidity Amount: 5\nMin Price: 0.21\nMax Price: 0.32"
    );

    let prompt = llm.last_prompt();
    assert!(prompt.contains("- Pool ID: TRUMP-SOL"));
    assert!(prompt.contains("- Fee Rate: 0.25%"));
    assert!(prompt.contains("My wallet has 1200 TRUMP and 0.32 SOL."));
}

#[tokio::test]
async fn test_unavailable_pool_still_prompts_with_message() {
    let llm = MockLlm::new(GOOD_ANSWER);
    let generator = ConfigGenerator::new(provider(false), llm.clone()).unwrap();

    generator.generate("100 SOL").await.unwrap();

    let prompt = llm.last_prompt();
    assert!(prompt.contains(
        "Pool current running parameters:\nUnable to fetch pool dynamic information.\n"
    ));
}

#[tokio::test]
async fn test_specific_pool_report_is_used() {
    let llm = MockLlm::new(GOOD_ANSWER);
    let source = StaticSource::new(true);
    let generator = ConfigGenerator::new(provider_with(source.clone()), llm.clone()).unwrap();

    generator.generate_for_pool("OTHER", "10 SOL").await.unwrap();

    let urls = source.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].ends_with("poolId=OTHER"), "fetched {}", urls[0]);
    assert!(!urls[0].contains("TRUMP-SOL"));
    assert!(llm.last_prompt().contains("- Pool ID: TRUMP-SOL"));
}

#[tokio::test]
async fn test_default_pool_report_fetches_default_pool() {
    let llm = MockLlm::new(GOOD_ANSWER);
    let source = StaticSource::new(true);
    let generator = ConfigGenerator::new(provider_with(source.clone()), llm).unwrap();

    generator.generate("10 SOL").await.unwrap();

    let urls = source.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].ends_with("poolId=TRUMP-SOL"), "fetched {}", urls[0]);
}

#[tokio::test]
async fn test_inverted_price_range_rejected() {
    let llm = MockLlm::new(
        r#"{"stepPercentage": 4, "addLiquidityAmount": 2, "minPrice": 0.4, "maxPrice": 0.2}"#,
    );
    let generator = ConfigGenerator::new(provider(true), llm).unwrap();

    let err = generator.generate("10 SOL").await.unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_answer_without_json_rejected() {
    let llm = MockLlm::new("I cannot determine a configuration.");
    let generator = ConfigGenerator::new(provider(true), llm).unwrap();

    let err = generator.generate("10 SOL").await.unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidResponse { .. }));
}
