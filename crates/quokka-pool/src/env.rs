//! Environment variable configuration for the pool provider
//!
//! Every setting can be reached through more than one name (see
//! `quokka_constants::settings`); the first non-empty value wins and the
//! defaults from `quokka_constants` apply otherwise. The `*_with` variants
//! take an explicit lookup so configuration can be resolved from any
//! key/value source.

use quokka_constants::{
    settings, DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POOL_ID, DEFAULT_POOL_INFO_PATH,
};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Read a variable from the process environment
pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// First non-empty value among `names`
pub fn first_setting<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Load a `.env` file from the working directory or its parents
///
/// Returns the loaded path, or `None` when there is no file. Logging the
/// outcome is left to the caller.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    found(dotenvy::dotenv())
}

/// Load the `.env` file at `path`, `None` when it does not exist
pub fn load_dotenv_file(path: &Path) -> Result<Option<PathBuf>, dotenvy::Error> {
    found(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn found(result: Result<PathBuf, dotenvy::Error>) -> Result<Option<PathBuf>, dotenvy::Error> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Remote endpoint configuration from environment variables
pub mod pool {
    use super::*;

    /// Pool monitoring base URL
    pub fn base_url_with<F: Fn(&str) -> Option<String>>(lookup: &F) -> String {
        first_setting(lookup, settings::BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Relative path of the pool-info endpoint
    pub fn pool_info_path_with<F: Fn(&str) -> Option<String>>(lookup: &F) -> String {
        first_setting(lookup, settings::POOL_INFO_PATH)
            .unwrap_or_else(|| DEFAULT_POOL_INFO_PATH.to_string())
    }

    /// Pool queried when the caller names none
    pub fn pool_id_with<F: Fn(&str) -> Option<String>>(lookup: &F) -> String {
        first_setting(lookup, settings::POOL_ID).unwrap_or_else(|| DEFAULT_POOL_ID.to_string())
    }

    /// Dynamic-info endpoint URL, unset by default
    pub fn dynamic_info_url_with<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<String> {
        first_setting(lookup, settings::DYNAMIC_INFO_URL)
    }
}

/// Timeout configuration from environment variables
pub mod timeouts {
    use super::*;

    /// Get HTTP request timeout in seconds
    pub fn http_request_seconds() -> u64 {
        http_request_seconds_with(&process_env)
    }

    pub fn http_request_seconds_with<F: Fn(&str) -> Option<String>>(lookup: &F) -> u64 {
        first_setting(lookup, settings::HTTP_TIMEOUT_SECS)
            .and_then(|s| u64::from_str(&s).ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
    }
}

/// Logging configuration from environment variables
pub mod logging {
    use super::*;

    /// Get the RUST_LOG filter, falling back to `default`
    pub fn rust_log_filter(default: &str) -> String {
        process_env("RUST_LOG")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}
