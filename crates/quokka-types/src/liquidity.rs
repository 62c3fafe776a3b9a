//! Ladder-step liquidity configuration produced by the config generator.

use serde::{Deserialize, Serialize};

/// Parameters of a ladder-step liquidity strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityConfig {
    /// Price move in percent, from the last adjustment point, that triggers another addition
    pub step_percentage: f64,
    /// Fixed token amount added each time the trigger fires
    pub add_liquidity_amount: f64,
    /// Lower bound of the liquidity range
    pub min_price: f64,
    /// Upper bound of the liquidity range
    pub max_price: f64,
}

impl LiquidityConfig {
    pub fn new(
        step_percentage: f64,
        add_liquidity_amount: f64,
        min_price: f64,
        max_price: f64,
    ) -> Self {
        Self {
            step_percentage,
            add_liquidity_amount,
            min_price,
            max_price,
        }
    }

    /// Check the invariants a usable config must hold, naming the first violation
    pub fn check(&self) -> Result<(), String> {
        let fields = [
            ("stepPercentage", self.step_percentage),
            ("addLiquidityAmount", self.add_liquidity_amount),
            ("minPrice", self.min_price),
            ("maxPrice", self.max_price),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{name} must be a finite number"));
        }
        if self.step_percentage <= 0.0 {
            return Err("stepPercentage must be greater than 0".to_string());
        }
        if self.add_liquidity_amount < 0.0 {
            return Err("addLiquidityAmount must not be negative".to_string());
        }
        if self.min_price > self.max_price {
            return Err(format!(
                "minPrice {} is above maxPrice {}",
                self.min_price, self.max_price
            ));
        }
        Ok(())
    }

    /// Human-readable summary sent back to the requester
    pub fn summary(&self) -> String {
        format!(
            "Configuration generated for Raydium CLMM pool.\n\nStep Percentage: {}%\nLiquidity Amount: {}\nMin Price: {}\nMax Price: {}",
            self.step_percentage, self.add_liquidity_amount, self.min_price, self.max_price
        )
    }
}
