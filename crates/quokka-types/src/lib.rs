pub mod liquidity;
pub mod pool;

pub use liquidity::*;
pub use pool::*;
