//! Constants for the quokka ecosystem
//!
//! This crate provides centralized constants that can be used across
//! multiple crates without creating circular dependencies.

/// Pool queried when no `POOL_ID` setting is present
pub const DEFAULT_POOL_ID: &str = "GQsPr4RJk9AZkkfWHud7v4MtotcxhaYzZHdsPCg9vNvW";

/// Remote host serving pool monitoring data
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Relative path of the pool-info endpoint under the base URL
pub const DEFAULT_POOL_INFO_PATH: &str = "pool-monitoring/info";

/// Query parameter carrying the pool identifier
pub const POOL_ID_QUERY_PARAM: &str = "poolId";

/// Lifetime of a cached pool metric in seconds
pub const POOL_CACHE_TTL_SECS: u64 = 60;

/// Default per-request HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Message returned by the report boundary when pool data is unavailable
pub const POOL_UNAVAILABLE_MESSAGE: &str = "Unable to fetch pool dynamic information.";

/// Retry defaults for the remote endpoints
pub mod retry {
    /// Attempts made against either endpoint before giving up
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Fixed delay between pool-info attempts
    pub const POOL_INFO_DELAY_MS: u64 = 1500;

    /// Fixed delay between dynamic-info attempts
    pub const DYNAMIC_INFO_DELAY_MS: u64 = 1000;
}

/// Cache key prefixes, one namespace per endpoint
pub mod cache_keys {
    /// Prefix for metrics fetched from the pool-info endpoint
    pub const POOL_INFO_PREFIX: &str = "pool-info-";

    /// Prefix for metrics fetched from the dynamic-info endpoint
    pub const DYNAMIC_INFO_PREFIX: &str = "pool-dynamic-info-";

    /// Cache key for a pool-info entry
    pub fn pool_info(pool_id: &str) -> String {
        format!("{POOL_INFO_PREFIX}{pool_id}")
    }

    /// Cache key for a dynamic-info entry
    pub fn dynamic_info(pool_id: &str) -> String {
        format!("{DYNAMIC_INFO_PREFIX}{pool_id}")
    }
}

/// Setting names, listed in lookup order
pub mod settings {
    pub const BASE_URL: &[&str] = &["QUOKKA_STEP_BASE_URL", "BASE_URL"];
    pub const POOL_INFO_PATH: &[&str] = &["QUOKKA_STEP_POOL_INFO", "POOL_INFO_PATH"];
    pub const POOL_ID: &[&str] = &["POOL_ID"];
    pub const DYNAMIC_INFO_URL: &[&str] = &["QUOKKA_STEP_DYNAMIC_INFO_URL", "DYNAMIC_INFO_URL"];
    pub const HTTP_TIMEOUT_SECS: &[&str] = &["HTTP_REQUEST_TIMEOUT_SECONDS"];

    pub const LLM_API_KEY: &str = "ZAI_API_KEY";
    pub const LLM_MODEL: &str = "GLM_MODEL";
    pub const LLM_API_URL: &str = "GLM_API_URL";
}

/// LLM defaults for config generation
pub mod llm {
    pub const DEFAULT_MODEL: &str = "glm-4.6";
    pub const DEFAULT_API_URL: &str = "https://api.z.ai/api/coding/paas/v4/chat/completions";
    pub const TEMPERATURE: f64 = 0.1;
    pub const MAX_TOKENS: u32 = 500;
}

/// Action name under which generated configs are reported
pub const GENERATE_CONFIG_ACTION: &str = "GENERATE_RAYDIUM_CLMM_CONFIG";

/// Alternative names accepted for the config action
///
/// `BUIDING_POOL_CONFIG` is the spelling already in use by existing callers.
pub const GENERATE_CONFIG_SIMILES: &[&str] = &[
    "CREATE_RAYDIUM_CLMM_CONFIG",
    "BUIDING_POOL_CONFIG",
    "BUILDING_POOL_CONFIG",
];

/// Check if an action name refers to config generation
pub fn is_generate_config_action(name: &str) -> bool {
    let normalized = name.trim().to_uppercase();
    normalized == GENERATE_CONFIG_ACTION || GENERATE_CONFIG_SIMILES.contains(&normalized.as_str())
}
