//! Prompt template for liquidity config generation
//!
//! Rendered with handlebars in strict mode with HTML escaping off, so the
//! pool report and the wallet message reach the model verbatim.

use crate::error::Result;
use handlebars::Handlebars;
use serde_json::json;
use tracing::{debug, instrument};

const TEMPLATE_NAME: &str = "raydium_clmm_config";

const CONFIG_PROMPT_TEMPLATE: &str = r#"
You are a Raydium CLMM liquidity configuration generation AI assistant. Please help me generate the recommended configuration for adding liquidity.
I will provide you with the following information:

Pool current running parameters:
{{pool_info}}

Wallet status of tokens held:
{{wallet_message}}

Respond with a JSON markdown block containing only the extracted values. Use null for any values that cannot be determined.

Example response:
```json
{
  "stepPercentage": 2,
  "addLiquidityAmount": 5,
  "minPrice": 10.2,
  "maxPrice": 12.2
}
```

Explanation of the meaning of returning parameters:

1. **stepPercentage** (number):
   - This defines the percentage price change (from the last adjustment point) required to trigger another liquidity addition.
   - It should be determined based on market volatility:
     - For **highly volatile** pools: 3%-5% is preferred.
     - For **low volatility** pools: 8%-10% or higher may be appropriate.
   - Use smaller values for sensitive or short-term strategies.
   - Avoid always returning the same value. Adjust based on the pool parameters.

2. **addLiquidityAmount** (number):
   - The fixed amount of tokens to add as liquidity each time the price trigger is met.
   - This should be a **reasonable fraction (like 5%-10%) of the user's current token balance**, considering that the balance needs to be preserved across multiple steps. Do NOT directly use the full wallet balance.
   - A higher value means more aggressive liquidity provision, while a lower value is more conservative.

3. **minPrice** (number):
   - The minimum price threshold for the liquidity range.
   - When the market price falls below this value, the system may stop adding liquidity or adjust strategy.
   - Typically set based on historical price data and volatility analysis.

4. **maxPrice** (number):
   - The maximum price threshold for the liquidity range.
   - When the market price rises above this value, the system may stop adding liquidity or adjust strategy.
   - Should be set to cover the expected price range where the token is most actively traded.
"#;

/// Renders the config generation prompt
#[derive(Debug)]
pub struct ConfigPrompt {
    handlebars: Handlebars<'static>,
}

impl ConfigPrompt {
    /// Compile the built-in template
    pub fn new() -> Result<Self> {
        Self::with_template(CONFIG_PROMPT_TEMPLATE)
    }

    /// Compile a custom template using `pool_info` and `wallet_message`
    pub fn with_template(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_template_string(TEMPLATE_NAME, template)?;
        Ok(Self { handlebars })
    }

    #[instrument(skip_all)]
    pub fn render(&self, pool_info: &str, wallet_message: &str) -> Result<String> {
        let context = json!({
            "pool_info": pool_info,
            "wallet_message": wallet_message,
        });
        let prompt = self.handlebars.render(TEMPLATE_NAME, &context)?;
        debug!(chars = prompt.len(), "Rendered config prompt");
        Ok(prompt)
    }
}

/// Render the built-in prompt in one call
pub fn render_config_prompt(pool_info: &str, wallet_message: &str) -> Result<String> {
    ConfigPrompt::new()?.render(pool_info, wallet_message)
}
