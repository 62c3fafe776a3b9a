//! Response validation
//!
//! Turns a decoded `PoolInfoEnvelope` into a `PoolMetric`. Both endpoints go
//! through the same rules: `data` present, `poolId`, `tokenA`, `tokenB` and
//! `price` present, each token with a `symbol` and `mint`, then the metric
//! invariants.

use crate::error::{PoolError, Result};
use quokka_types::{
    PoolInfoEnvelope, PoolMetric, RawPoolMetric, RawTokenInfo, StatsWindow, TokenInfo,
};
use std::cmp::Ordering;

/// Validate an envelope and build the metric it carries
pub fn validate_envelope(envelope: PoolInfoEnvelope) -> Result<PoolMetric> {
    let raw = envelope
        .data
        .ok_or_else(|| PoolError::validation("data", "response has no data field"))?;
    validate_metric(raw)
}

/// Validate a raw metric and build the typed `PoolMetric`
pub fn validate_metric(raw: RawPoolMetric) -> Result<PoolMetric> {
    // Checked on the raw values so a window missing one end is left alone
    let price_ranges = check_price_ranges(&raw);

    let stats_24h = raw.window_stats(StatsWindow::Day);
    let stats_7d = raw.window_stats(StatsWindow::Week);
    let stats_30d = raw.window_stats(StatsWindow::Month);

    let pool_id = raw
        .pool_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| missing("poolId"))?;
    let token_a = raw.token_a.ok_or_else(|| missing("tokenA"))?;
    let token_b = raw.token_b.ok_or_else(|| missing("tokenB"))?;
    let price = raw.price.ok_or_else(|| missing("price"))?;
    let token_a = validate_token("tokenA", token_a)?;
    let token_b = validate_token("tokenB", token_b)?;

    let metric = PoolMetric {
        pool_id,
        token_a,
        token_b,
        price,
        mint_amount_a: raw.mint_amount_a.unwrap_or_default(),
        mint_amount_b: raw.mint_amount_b.unwrap_or_default(),
        fee_rate: raw.fee_rate.unwrap_or_default(),
        tvl: raw.tvl.unwrap_or_default(),
        stats_24h,
        stats_7d,
        stats_30d,
    };
    check_invariants(&metric)?;
    price_ranges?;
    Ok(metric)
}

fn validate_token(side: &str, raw: RawTokenInfo) -> Result<TokenInfo> {
    let symbol = raw.symbol.ok_or_else(|| missing(&format!("{side}.symbol")))?;
    let mint = raw.mint.ok_or_else(|| missing(&format!("{side}.mint")))?;
    Ok(TokenInfo::new(symbol, mint, raw.decimals.unwrap_or_default()))
}

fn missing(field: &str) -> PoolError {
    PoolError::validation(field, "missing required field")
}

/// Windows that carry both ends must have `priceMin <= priceMax`
fn check_price_ranges(raw: &RawPoolMetric) -> Result<()> {
    for window in StatsWindow::all() {
        let (Some(min), Some(max)) = raw.price_range(window) else {
            continue;
        };
        // NaN on either side fails too
        if matches!(min.partial_cmp(&max), None | Some(Ordering::Greater)) {
            return Err(PoolError::validation(
                format!("priceMin{window}"),
                format!("price range inverted: {min} > {max}"),
            ));
        }
    }
    Ok(())
}

fn check_invariants(metric: &PoolMetric) -> Result<()> {
    if !(metric.price.is_finite() && metric.price > 0.0) {
        return Err(PoolError::validation(
            "price",
            format!("must be positive, got {}", metric.price),
        ));
    }

    if !(0.0..=1.0).contains(&metric.fee_rate) {
        return Err(PoolError::validation(
            "feeRate",
            format!("must be between 0 and 1, got {}", metric.fee_rate),
        ));
    }

    if !(metric.tvl.is_finite() && metric.tvl >= 0.0) {
        return Err(PoolError::validation(
            "tvl",
            format!("must not be negative, got {}", metric.tvl),
        ));
    }

    Ok(())
}
