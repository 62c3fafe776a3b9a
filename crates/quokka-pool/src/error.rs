//! Pool provider error handling
//!
//! Every failure of the fetch pipeline is a `PoolError`. The variants keep
//! the HTTP status and the underlying source so that callers and logs see
//! the exact reason, while `is_retryable` and `kind` give the coarse
//! classification the retry executor and the report boundary work with.

use thiserror::Error;

/// Result type for pool provider operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Pool provider error types
#[derive(Error, Debug)]
pub enum PoolError {
    /// Transport failure with no HTTP status: connect, timeout, body read
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote answered with a 5xx status
    #[error("Server error {status} from {url}")]
    Server { status: u16, url: String },

    /// Remote answered with a non-success, non-5xx status
    #[error("Request rejected with status {status} by {url}")]
    Client { status: u16, url: String },

    /// Body could not be decoded as the expected envelope
    #[error("Malformed response: {message}")]
    Malformed {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Well-formed response missing or violating a required field
    #[error("Invalid pool data: {field} - {message}")]
    Validation { field: String, message: String },

    /// Key absent or expired in the cache
    #[error("Cache miss: {key}")]
    CacheMiss { key: String },

    /// Missing or unusable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Coarse classes of pool errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or 5xx
    Network,
    /// 4xx or structurally invalid payload
    Client,
    /// Response missing required semantic fields
    Validation,
    /// Internal signal to proceed to fetch
    CacheMiss,
    /// Provider misconfigured
    Configuration,
}

impl PoolError {
    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source<
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create the error matching a non-success HTTP status
    pub fn from_status<U: Into<String>>(status: u16, url: U) -> Self {
        if (500..600).contains(&status) {
            Self::Server {
                status,
                url: url.into(),
            }
        } else {
            Self::Client {
                status,
                url: url.into(),
            }
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new malformed-response error from a decode failure
    pub fn malformed_with_source<S: Into<String>>(message: S, source: serde_json::Error) -> Self {
        Self::Malformed {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new cache miss signal
    pub fn cache_miss<S: Into<String>>(key: S) -> Self {
        Self::CacheMiss { key: key.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is retryable
    ///
    /// Transport failures and 5xx responses are. Malformed bodies are not;
    /// `RetryPolicy::retry_malformed` opts them in.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Server { .. } => true,
            Self::Client { .. } => false,
            Self::Malformed { .. } => false,
            Self::Validation { .. } => false,
            Self::CacheMiss { .. } => false,
            Self::Config { .. } => false,
        }
    }

    /// Coarse classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::Server { .. } => ErrorKind::Network,
            Self::Client { .. } | Self::Malformed { .. } => ErrorKind::Client,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::CacheMiss { .. } => ErrorKind::CacheMiss,
            Self::Config { .. } => ErrorKind::Configuration,
        }
    }
}

impl From<reqwest::Error> for PoolError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            return Self::from_status(status.as_u16(), url);
        }
        if err.is_decode() {
            return Self::Malformed {
                message: err.to_string(),
                source: None,
            };
        }
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        Self::network_with_source(message, err)
    }
}

impl From<serde_json::Error> for PoolError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed_with_source("response body is not a valid pool envelope", err)
    }
}
