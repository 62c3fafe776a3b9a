//! Config generator error handling

use thiserror::Error;

/// Result type for config generation
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Config generator error types
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Prompt template failed to register or render
    #[error("Template error: {0}")]
    Template(String),

    /// LLM call failed: transport, status or empty answer
    #[error("LLM request failed: {message}")]
    Llm {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// LLM answer carried no usable JSON config
    #[error("Invalid LLM response: {message}")]
    InvalidResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Parsed config violates its invariants
    #[error("Invalid liquidity config: {0}")]
    InvalidConfig(String),

    /// Missing or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GeneratorError {
    /// Create a new LLM error
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new LLM error with source
    pub fn llm_with_source<S: Into<String>>(message: S, source: reqwest::Error) -> Self {
        Self::Llm {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new invalid-response error from a decode failure
    pub fn invalid_response_with_source<S: Into<String>>(
        message: S,
        source: serde_json::Error,
    ) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            source: Some(source),
        }
    }
}

impl From<handlebars::RenderError> for GeneratorError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for GeneratorError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}
