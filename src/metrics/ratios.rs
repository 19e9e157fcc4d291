// src/metrics/ratios.rs
use crate::error::Result;
use crate::metrics::returns::{numeric_values, ReturnCalculator};
use polars::prelude::*;
use std::collections::HashMap;

/// Assumed trading days per year, used to scale daily statistics to yearly.
pub const TRADING_DAYS: f64 = 252.0;

/// Risk-adjusted performance statistics, one scalar per instrument column.
///
/// All ratios reduce a table of simple daily returns; volatility uses the
/// population standard deviation (denominator n). Division by zero volatility
/// yields infinity/NaN and is returned as such, never raised.
pub struct RiskCalculator;

impl RiskCalculator {
    /// Mean simple daily return scaled by [`TRADING_DAYS`]. Requires at least
    /// two price rows; with exactly two the mean degenerates to the single
    /// observed return.
    pub fn annualised_return(df: &DataFrame) -> Result<HashMap<String, f64>> {
        let daily = ReturnCalculator::simple_return(df)?;
        Self::reduce(&daily, |r| mean(r) * TRADING_DAYS)
    }

    /// Population standard deviation of simple daily returns scaled by
    /// `sqrt(TRADING_DAYS)`.
    pub fn annual_volatility(df: &DataFrame) -> Result<HashMap<String, f64>> {
        let daily = ReturnCalculator::simple_return(df)?;
        Self::reduce(&daily, |r| std_pop(r) * TRADING_DAYS.sqrt())
    }

    /// Annualised return over annual volatility.
    pub fn info_ratio(df: &DataFrame) -> Result<HashMap<String, f64>> {
        let daily = ReturnCalculator::simple_return(df)?;
        Self::reduce(&daily, |r| {
            (mean(r) * TRADING_DAYS) / (std_pop(r) * TRADING_DAYS.sqrt())
        })
    }

    /// Annualised Sharpe ratio. `risk_free` is an annualized decimal rate
    /// (0.06 = 6%), applied uniformly to every column.
    pub fn sharpe_ratio(df: &DataFrame, risk_free: f64) -> Result<HashMap<String, f64>> {
        let daily = ReturnCalculator::simple_return(df)?;
        Self::reduce(&daily, |r| {
            (mean(r) * TRADING_DAYS - risk_free) / (std_pop(r) * TRADING_DAYS.sqrt())
        })
    }

    /// Sortino ratio over `period`-step returns: penalises only downside
    /// deviation from `target_return`, not upside volatility.
    ///
    /// Deviations `min(0, r - target_return)` are squared and averaged over
    /// all period observations (not just the downside subset), then
    /// square-rooted into the target downside deviation. The ratio is
    /// `(mean(period_return) - risk_free) / tdd`.
    ///
    /// `risk_free` is subtracted from the per-period mean as-is, without
    /// annualisation adjustment; callers must pass a rate on the same footing
    /// as `period`. This keeps the historical formulation of the calculation.
    pub fn sortino_ratio(
        df: &DataFrame,
        target_return: f64,
        risk_free: f64,
        period: usize,
    ) -> Result<HashMap<String, f64>> {
        let prd = ReturnCalculator::period_return(df, period)?;
        Self::reduce(&prd, |r| {
            let downside_sq_sum: f64 = r
                .iter()
                .map(|&x| (x - target_return).min(0.0).powi(2))
                .sum();
            let tdd = (downside_sq_sum / r.len() as f64).sqrt();
            (mean(r) - risk_free) / tdd
        })
    }

    fn reduce(
        returns: &DataFrame,
        statistic: impl Fn(&[f64]) -> f64,
    ) -> Result<HashMap<String, f64>> {
        let mut out = HashMap::new();
        for col in returns.get_columns() {
            let values = numeric_values(col)?;
            out.insert(col.name().to_string(), statistic(&values));
        }
        Ok(out)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_pop(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_annualised_return_two_rows_degenerates_to_single_return() {
        let df = df! { "A" => &[100.0, 101.0] }.unwrap();
        let ann = RiskCalculator::annualised_return(&df).unwrap();
        assert!((ann["A"] - 0.01 * TRADING_DAYS).abs() < 1e-12);
    }

    #[test]
    fn test_constant_prices_have_zero_volatility() {
        let df = df! { "A" => &[50.0, 50.0, 50.0, 50.0] }.unwrap();
        let vol = RiskCalculator::annual_volatility(&df).unwrap();
        assert_eq!(vol["A"], 0.0);
    }

    #[test]
    fn test_info_ratio_matches_sharpe_at_zero_risk_free() {
        let df = df! { "A" => &[100.0, 102.0, 101.0, 105.0] }.unwrap();
        let info = RiskCalculator::info_ratio(&df).unwrap();
        let sharpe = RiskCalculator::sharpe_ratio(&df, 0.0).unwrap();
        assert!((info["A"] - sharpe["A"]).abs() < 1e-12);
    }

    #[test]
    fn test_sharpe_with_zero_volatility_is_infinite() {
        // Zero volatility with a non-zero excess return (risk-free 6%).
        let df = df! { "A" => &[100.0, 100.0, 100.0] }.unwrap();
        let sharpe = RiskCalculator::sharpe_ratio(&df, 0.06).unwrap();
        assert!(sharpe["A"].is_infinite());
    }

    #[test]
    fn test_sortino_all_downside_uses_every_point() {
        // Target above every observed return: tdd over all points.
        let df = df! { "A" => &[100.0, 99.0, 98.0] }.unwrap();
        let prd = ReturnCalculator::period_return(&df, 1).unwrap();
        let r = numeric_values(prd.column("A").unwrap()).unwrap();

        let target = 0.5;
        let expected_tdd = (r
            .iter()
            .map(|&x| (x - target).min(0.0).powi(2))
            .sum::<f64>()
            / r.len() as f64)
            .sqrt();
        let expected = (mean(&r) - 0.0) / expected_tdd;

        let sortino = RiskCalculator::sortino_ratio(&df, target, 0.0, 1).unwrap();
        assert!((sortino["A"] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sortino_no_downside_is_undefined() {
        // Target below every observed return: zero downside deviation.
        let df = df! { "A" => &[100.0, 101.0, 102.0] }.unwrap();
        let sortino = RiskCalculator::sortino_ratio(&df, -0.5, 0.0, 1).unwrap();
        assert!(sortino["A"].is_infinite() || sortino["A"].is_nan());
    }
}
