//! Plain-text pool report
//!
//! Numbers use Rust's shortest round-trip `Display` form (`1.5`, `100`,
//! `0.25`). The fee percentage is rounded to six decimals first.

use quokka_types::{PoolMetric, WindowStats};

const FEE_PERCENT_DECIMALS: i32 = 6;

/// Render every field of `metric` into the fixed report layout
pub fn format_pool_info(metric: &PoolMetric) -> String {
    let mut out = format!(
        "Pool Info:\n\
         - Pool ID: {}\n\
         - Token A: {} ({})\n\
         - Token B: {} ({})\n\
         - Current Price: ${}\n\
         - Mint Amount A: {}\n\
         - Mint Amount B: {}\n\
         - Fee Rate: {}%\n\
         - TVL: ${}",
        metric.pool_id,
        metric.token_a.symbol,
        metric.token_a.mint,
        metric.token_b.symbol,
        metric.token_b.mint,
        metric.price,
        metric.mint_amount_a,
        metric.mint_amount_b,
        fee_percent(metric.fee_rate),
        metric.tvl,
    );

    for (window, stats) in metric.windows() {
        out.push_str("\n\n");
        out.push_str(&format_window(&window.to_string(), stats));
    }

    out
}

fn format_window(label: &str, stats: &WindowStats) -> String {
    format!(
        "{label} Stats:\n\
         - Volume: ${}\n\
         - Volume Fee: ${}\n\
         - APR: {}%\n\
         - Price Range: ${} ~ ${}",
        stats.volume, stats.volume_fee, stats.apr, stats.price_min, stats.price_max,
    )
}

/// Fee rate as a percentage with float noise removed
pub fn fee_percent(fee_rate: f64) -> f64 {
    let scale = 10f64.powi(FEE_PERCENT_DECIMALS);
    let percent = (fee_rate * 100.0 * scale).round() / scale;
    // avoid rendering "-0"
    if percent == 0.0 {
        0.0
    } else {
        percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quokka_types::TokenInfo;

    fn metric() -> PoolMetric {
        PoolMetric {
            pool_id: "P1".to_string(),
            token_a: TokenInfo::new("SOL", "So111", 9),
            token_b: TokenInfo::new("USDC", "EPjF", 6),
            price: 1.5,
            mint_amount_a: 1000.0,
            mint_amount_b: 2500.25,
            fee_rate: 0.0025,
            tvl: 100.0,
            stats_24h: WindowStats {
                volume: 1200.0,
                volume_fee: 3.0,
                apr: 12.5,
                price_min: 1.2,
                price_max: 1.8,
            },
            stats_7d: WindowStats::default(),
            stats_30d: WindowStats {
                volume: 50000.0,
                volume_fee: 125.0,
                apr: 9.75,
                price_min: 0.9,
                price_max: 2.0,
            },
        }
    }

    #[test]
    fn test_report_layout() {
        let expected = "Pool Info:
- Pool ID: P1
- Token A: SOL (So111)
- Token B: USDC (EPjF)
- Current Price: $1.5
- Mint Amount A: 1000
- Mint Amount B: 2500.25
- Fee Rate: 0.25%
- TVL: $100

24h Stats:
- Volume: $1200
- Volume Fee: $3
- APR: 12.5%
- Price Range: $1.2 ~ $1.8

7d Stats:
- Volume: $0
- Volume Fee: $0
- APR: 0%
- Price Range: $0 ~ $0

30d Stats:
- Volume: $50000
- Volume Fee: $125
- APR: 9.75%
- Price Range: $0.9 ~ $2";

        assert_eq!(format_pool_info(&metric()), expected);
    }

    #[test]
    fn test_report_is_deterministic() {
        let m = metric();
        assert_eq!(format_pool_info(&m), format_pool_info(&m));
    }

    #[test]
    fn test_window_block_layout() {
        let stats = WindowStats {
            volume: 10.0,
            volume_fee: 0.5,
            apr: 3.0,
            price_min: 0.2,
            price_max: 0.3,
        };
        assert_eq!(
            format_window("7d", &stats),
            "7d Stats:\n- Volume: $10\n- Volume Fee: $0.5\n- APR: 3%\n- Price Range: $0.2 ~ $0.3"
        );
    }

    #[test]
    fn test_fee_percent_strips_float_noise() {
        assert_eq!(fee_percent(0.0025).to_string(), "0.25");
        assert_eq!(fee_percent(0.0001).to_string(), "0.01");
        assert_eq!(fee_percent(0.003).to_string(), "0.3");
        assert_eq!(fee_percent(0.0).to_string(), "0");
    }
}
