use crate::error::{FinmetricsError, Result};
use polars::prelude::*;

/// Return transforms over a price table: one column per instrument, rows in
/// ascending date order, numeric cells only.
///
/// Missing values propagate through the arithmetic as NaN; they are never
/// rejected here. Callers wanting complete columns should filter the table
/// through [`crate::data::drop_null_columns`] first.
pub struct ReturnCalculator;

impl ReturnCalculator {
    /// Relative return of a 1-D sequence: element i = `a[i+1] / a[i]`.
    ///
    /// No guard against zero or negative values; division by zero yields
    /// infinity/NaN per IEEE semantics, which is accepted behavior.
    pub fn relative_return(a: &[f64]) -> Vec<f64> {
        a.windows(2).map(|w| w[1] / w[0]).collect()
    }

    /// Log returns per column: `ln(p_t) - ln(p_t-1)`, first row dropped.
    /// Non-positive prices yield NaN, propagated rather than raised.
    pub fn log_return(df: &DataFrame) -> Result<DataFrame> {
        Self::lagged(df, 1, |curr, prev| curr.ln() - prev.ln())
    }

    /// Simple (percentage) returns per column: `(p_t - p_t-1) / p_t-1`,
    /// first row dropped.
    pub fn simple_return(df: &DataFrame) -> Result<DataFrame> {
        Self::lagged(df, 1, |curr, prev| (curr - prev) / prev)
    }

    /// `period`-step percentage change per column, first `period` rows
    /// dropped (they have no earlier observation to difference against).
    pub fn period_return(df: &DataFrame, period: usize) -> Result<DataFrame> {
        if period == 0 {
            return Err(FinmetricsError::Computation(
                "return period must be at least 1".to_string(),
            ));
        }
        Self::lagged(df, period, |curr, prev| (curr - prev) / prev)
    }

    fn lagged(
        df: &DataFrame,
        lag: usize,
        combine: impl Fn(f64, f64) -> f64,
    ) -> Result<DataFrame> {
        let height = df.height();
        if height <= lag {
            return Err(FinmetricsError::Computation(format!(
                "need at least {} rows to compute {}-step returns, found {}",
                lag + 1,
                lag,
                height
            )));
        }

        let mut out = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let values = numeric_values(col)?;
            let mut returns = Vec::with_capacity(height - lag);
            for i in lag..height {
                returns.push(combine(values[i], values[i - lag]));
            }
            out.push(Column::new(col.name().clone(), returns));
        }

        Ok(DataFrame::new(out)?)
    }
}

/// Extract a column as f64 values, with nulls carried as NaN.
pub(crate) fn numeric_values(col: &Column) -> Result<Vec<f64>> {
    if !matches!(
        col.dtype(),
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    ) {
        return Err(FinmetricsError::Computation(format!(
            "column '{}' must be numeric, found {:?}",
            col.name(),
            col.dtype()
        )));
    }

    let cast = col.cast(&DataType::Float64)?;
    let ca = cast.f64()?;

    let mut values = Vec::with_capacity(ca.len());
    for i in 0..ca.len() {
        values.push(ca.get(i).unwrap_or(f64::NAN));
    }
    Ok(values)
}
