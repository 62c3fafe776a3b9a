//! LLM client for config generation
//!
//! `LlmClient` is the seam between the generator and a model vendor.
//! `GlmClient` talks to the ZAI chat-completions API.

use crate::error::{GeneratorError, Result};
use async_trait::async_trait;
use quokka_constants::{llm, settings};
use quokka_pool::env::{first_setting, process_env, timeouts};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const SYSTEM_PROMPT: &str = "You are a DeFi liquidity assistant that generates Raydium CLMM configurations. Always respond with a JSON markdown block only. Respond in English only.";

/// Trait for LLM client abstraction
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `prompt` and return the model's text answer
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// GLM client over the ZAI chat-completions API
#[derive(Debug, Clone)]
pub struct GlmClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: String,
    temperature: f64,
    max_tokens: u32,
}

impl GlmClient {
    /// Create a new GLM client
    pub fn new(model: &str, api_key: &str) -> Result<Self> {
        let timeout = Duration::from_secs(timeouts::http_request_seconds());
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeneratorError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: llm::DEFAULT_API_URL.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            temperature: llm::TEMPERATURE,
            max_tokens: llm::MAX_TOKENS,
        })
    }

    /// Initialize with environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = first_setting(lookup, &[settings::LLM_API_KEY]).ok_or_else(|| {
            GeneratorError::Config(format!(
                "{} environment variable not set",
                settings::LLM_API_KEY
            ))
        })?;
        let model = first_setting(lookup, &[settings::LLM_MODEL])
            .unwrap_or_else(|| llm::DEFAULT_MODEL.to_string());

        let mut client = Self::new(&model, &api_key)?;
        if let Some(url) = first_setting(lookup, &[settings::LLM_API_URL]) {
            client.api_url = url;
        }
        Ok(client)
    }

    /// Override the chat-completions endpoint
    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl LlmClient for GlmClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        info!("Requesting liquidity config from ZAI API");
        debug!(prompt_chars = prompt.len(), "Prompt prepared");

        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to ZAI API");
                GeneratorError::llm_with_source("failed to send request", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::llm(format!(
                "ZAI API returned error: {status} - {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse ZAI API response");
            GeneratorError::llm_with_source("failed to parse response", e)
        })?;

        let content = extract_message_content(&response_json)?;
        debug!(chars = content.len(), "Extracted LLM content");
        Ok(content)
    }
}

/// Text of the first choice: `content`, falling back to `reasoning_content`
pub fn extract_message_content(response: &Value) -> Result<String> {
    let message = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| GeneratorError::llm("invalid response format from ZAI API"))?;

    let non_empty = |key: &str| {
        message
            .get(key)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    };

    non_empty("content")
        .or_else(|| non_empty("reasoning_content"))
        .map(str::to_string)
        .ok_or_else(|| GeneratorError::llm("LLM returned empty response"))
}
