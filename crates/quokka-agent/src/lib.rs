//! # quokka-agent
//!
//! Ladder-step liquidity config generation for Raydium CLMM pools.
//!
//! The generator reads the pool report from `quokka-pool`, renders it with
//! the caller's wallet description into a prompt, and turns the LLM answer
//! into a checked `LiquidityConfig`.

pub mod error;
pub mod generator;
pub mod llm;
pub mod prompt;

pub use error::{GeneratorError, Result};
pub use generator::{extract_json, parse_config, ConfigGenerator, GeneratedConfig};
pub use llm::{GlmClient, LlmClient};
pub use prompt::{render_config_prompt, ConfigPrompt};

pub use quokka_constants::{is_generate_config_action, GENERATE_CONFIG_ACTION};
pub use quokka_types::LiquidityConfig;
