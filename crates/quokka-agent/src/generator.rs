//! Liquidity config generation
//!
//! Combines the pool report with the caller's wallet description, asks the
//! LLM for a ladder-step configuration and checks the answer before handing
//! it back.

use crate::error::{GeneratorError, Result};
use crate::llm::LlmClient;
use crate::prompt::ConfigPrompt;
use quokka_constants::GENERATE_CONFIG_ACTION;
use quokka_pool::PoolMetricsProvider;
use quokka_types::LiquidityConfig;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const FENCED_JSON: &str = r"(?s)```(?:json)?\s*(\{.*?\})\s*```";

/// Config produced for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedConfig {
    /// Action name the result is reported under
    pub action: String,
    pub config: LiquidityConfig,
    /// Summary text for the requester
    pub text: String,
}

impl GeneratedConfig {
    pub fn new(config: LiquidityConfig) -> Self {
        Self {
            action: GENERATE_CONFIG_ACTION.to_string(),
            text: config.summary(),
            config,
        }
    }
}

/// Generates ladder-step configs from pool metrics and a wallet message
pub struct ConfigGenerator {
    provider: Arc<PoolMetricsProvider>,
    llm: Arc<dyn LlmClient>,
    prompt: ConfigPrompt,
}

impl ConfigGenerator {
    pub fn new(provider: Arc<PoolMetricsProvider>, llm: Arc<dyn LlmClient>) -> Result<Self> {
        Ok(Self {
            provider,
            llm,
            prompt: ConfigPrompt::new()?,
        })
    }

    /// Generate a config for the provider's default pool
    pub async fn generate(&self, wallet_message: &str) -> Result<GeneratedConfig> {
        let pool_info = self.provider.get_default_pool_report().await;
        self.generate_with_report(&pool_info, wallet_message).await
    }

    /// Generate a config for a specific pool
    pub async fn generate_for_pool(
        &self,
        pool_id: &str,
        wallet_message: &str,
    ) -> Result<GeneratedConfig> {
        let pool_info = self.provider.get_formatted_pool_report(pool_id).await;
        self.generate_with_report(&pool_info, wallet_message).await
    }

    #[instrument(skip_all)]
    async fn generate_with_report(
        &self,
        pool_info: &str,
        wallet_message: &str,
    ) -> Result<GeneratedConfig> {
        info!("Starting liquidity config generation");
        debug!(pool_info, wallet_message, "Generation inputs");

        let prompt = self.prompt.render(pool_info, wallet_message)?;
        let answer = self.llm.complete(&prompt).await?;
        let config = parse_config(&answer)?;

        info!(
            step_percentage = config.step_percentage,
            add_liquidity_amount = config.add_liquidity_amount,
            min_price = config.min_price,
            max_price = config.max_price,
            "Generated liquidity config"
        );
        Ok(GeneratedConfig::new(config))
    }
}

/// Extract, decode and check a `LiquidityConfig` from LLM output
pub fn parse_config(answer: &str) -> Result<LiquidityConfig> {
    let json = extract_json(answer)?;
    let config: LiquidityConfig = serde_json::from_str(&json).map_err(|e| {
        warn!(error = %e, "LLM answer is not a liquidity config");
        GeneratorError::invalid_response_with_source("answer does not match the config schema", e)
    })?;
    config.check().map_err(GeneratorError::InvalidConfig)?;
    Ok(config)
}

/// JSON object in `text`: a fenced block first, else the outermost braces
pub fn extract_json(text: &str) -> Result<String> {
    let fenced = Regex::new(FENCED_JSON)
        .map_err(|e| GeneratorError::invalid_response(format!("bad extraction pattern: {e}")))?;
    if let Some(block) = fenced.captures(text).and_then(|c| c.get(1)) {
        return Ok(block.as_str().to_string());
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(text[start..=end].to_string()),
        _ => Err(GeneratorError::invalid_response(
            "no JSON object found in LLM answer",
        )),
    }
}
