pub mod ratios;
pub mod returns;

pub use ratios::{RiskCalculator, TRADING_DAYS};
pub use returns::ReturnCalculator;
