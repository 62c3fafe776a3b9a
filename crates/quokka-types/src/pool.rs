//! Pool Metric Types
//!
//! This module contains the liquidity-pool data model: the validated
//! `PoolMetric` handed to callers, and the raw wire shape returned by the
//! pool monitoring endpoints.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// One side of a pool's token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Ticker symbol, e.g. `SOL`
    pub symbol: String,
    /// Mint address
    pub mint: String,
    /// Decimal precision of the mint
    #[serde(default)]
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(symbol: impl Into<String>, mint: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            mint: mint.into(),
            decimals,
        }
    }
}

/// Token object as served on the wire, checked by validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTokenInfo {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub mint: Option<String>,
    /// Absent or `null` reads as 0
    #[serde(default)]
    pub decimals: Option<u8>,
}

impl RawTokenInfo {
    pub fn new(symbol: impl Into<String>, mint: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: Some(symbol.into()),
            mint: Some(mint.into()),
            decimals: Some(decimals),
        }
    }
}

/// Rolling statistics windows reported for every pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum StatsWindow {
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    Day,
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    Week,
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    Month,
}

impl StatsWindow {
    /// All windows in report order
    pub fn all() -> impl Iterator<Item = StatsWindow> {
        StatsWindow::iter()
    }
}

/// Volume, fee, APR and price range over one statistics window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub volume: f64,
    pub volume_fee: f64,
    /// Annualised return in percent
    pub apr: f64,
    pub price_min: f64,
    pub price_max: f64,
}

/// Validated market state of a liquidity pool
///
/// Built only from a fetch response that passed validation, so `price > 0`,
/// `fee_rate` lies in `[0, 1]`, `tvl >= 0` and every window has
/// `price_min <= price_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMetric {
    pub pool_id: String,
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    /// Current quote of token A in token B
    pub price: f64,
    /// Reserve of token A
    pub mint_amount_a: f64,
    /// Reserve of token B
    pub mint_amount_b: f64,
    /// Fee as a fraction, `0.0025` = 0.25%
    pub fee_rate: f64,
    /// Total value locked in USD
    pub tvl: f64,
    pub stats_24h: WindowStats,
    pub stats_7d: WindowStats,
    pub stats_30d: WindowStats,
}

impl PoolMetric {
    /// Statistics for the given window
    pub fn stats(&self, window: StatsWindow) -> &WindowStats {
        match window {
            StatsWindow::Day => &self.stats_24h,
            StatsWindow::Week => &self.stats_7d,
            StatsWindow::Month => &self.stats_30d,
        }
    }

    /// Windows paired with their statistics, in report order
    pub fn windows(&self) -> impl Iterator<Item = (StatsWindow, &WindowStats)> {
        StatsWindow::all().map(move |window| (window, self.stats(window)))
    }
}

/// Pool metric exactly as served on the wire
///
/// Every field is optional so that a response can be decoded before it is
/// checked; see `quokka_pool::validation` for the rules applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPoolMetric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_a: Option<RawTokenInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_b: Option<RawTokenInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_amount_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_amount_b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl: Option<f64>,

    // 24h stats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_fee_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apr_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max_24h: Option<f64>,

    // 7d stats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_7d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_fee_7d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apr_7d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min_7d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max_7d: Option<f64>,

    // 30d stats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_30d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_fee_30d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apr_30d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min_30d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max_30d: Option<f64>,
}

impl RawPoolMetric {
    /// `(volume, volume_fee, apr, price_min, price_max)` of a window as sent
    fn window_fields(
        &self,
        window: StatsWindow,
    ) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
        match window {
            StatsWindow::Day => (
                self.volume_24h,
                self.volume_fee_24h,
                self.apr_24h,
                self.price_min_24h,
                self.price_max_24h,
            ),
            StatsWindow::Week => (
                self.volume_7d,
                self.volume_fee_7d,
                self.apr_7d,
                self.price_min_7d,
                self.price_max_7d,
            ),
            StatsWindow::Month => (
                self.volume_30d,
                self.volume_fee_30d,
                self.apr_30d,
                self.price_min_30d,
                self.price_max_30d,
            ),
        }
    }

    /// `(price_min, price_max)` of a window, `None` where the payload omits it
    pub fn price_range(&self, window: StatsWindow) -> (Option<f64>, Option<f64>) {
        let (_, _, _, price_min, price_max) = self.window_fields(window);
        (price_min, price_max)
    }

    /// Statistics for a window, absent fields read as zero
    pub fn window_stats(&self, window: StatsWindow) -> WindowStats {
        let (volume, volume_fee, apr, price_min, price_max) = self.window_fields(window);

        WindowStats {
            volume: volume.unwrap_or_default(),
            volume_fee: volume_fee.unwrap_or_default(),
            apr: apr.unwrap_or_default(),
            price_min: price_min.unwrap_or_default(),
            price_max: price_max.unwrap_or_default(),
        }
    }
}

/// Response envelope `{ "data": ... }` of both pool endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolInfoEnvelope {
    #[serde(default)]
    pub data: Option<RawPoolMetric>,
}

impl PoolInfoEnvelope {
    pub fn new(data: RawPoolMetric) -> Self {
        Self { data: Some(data) }
    }
}
