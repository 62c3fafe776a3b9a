//! # Quokka Pool
//!
//! Cached, retrying access to liquidity-pool metrics served by a pool
//! monitoring service.
//!
//! ## Features
//!
//! - **TTL Cache**: process-local, lazily pruned, shared through `Arc`
//! - **Bounded Retry**: transport failures and 5xx retried with a fixed delay
//! - **Validation**: both endpoints checked against the same rules
//! - **Degrading Report**: a text report that never fails
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quokka_pool::PoolMetricsProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = PoolMetricsProvider::from_env()?;
//!
//!     let metric = provider.get_pool_info("GQsPr4RJk9AZkkfWHud7v4MtotcxhaYzZHdsPCg9vNvW").await?;
//!     println!("{}", provider.format_pool_info(&metric));
//!
//!     // Never fails, degrades to a fixed message
//!     println!("{}", provider.get_default_pool_report().await);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod env;
pub mod error;
pub mod format;
pub mod provider;
pub mod retry;
pub mod source;
pub mod validation;

pub use cache::{CacheStats, TtlCache};
pub use config::PoolProviderConfig;
pub use error::{ErrorKind, PoolError, Result};
pub use format::format_pool_info;
pub use provider::{PoolEndpoint, PoolMetricsProvider};
pub use retry::{RetryExecutor, RetryPolicy};
pub use source::{HttpPoolSource, PoolSource};
pub use validation::{validate_envelope, validate_metric};

pub use quokka_types::{
    PoolInfoEnvelope, PoolMetric, RawPoolMetric, RawTokenInfo, StatsWindow, TokenInfo, WindowStats,
};
