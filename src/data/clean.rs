// src/data/clean.rs
use crate::error::Result;
use polars::prelude::*;

/// Remove every column containing at least one missing value.
///
/// Missing means a polars null, or a NaN in a float column (NaN is how a
/// missing price survives arithmetic like a log return of a bad observation).
/// Returns the reduced table together with the dropped column names; the
/// listing is also logged as a warning. The input is never mutated.
///
/// The return calculators assume complete columns and propagate NaN blindly,
/// so callers are expected to run tables through this before computing
/// log-return based statistics.
pub fn drop_null_columns(df: &DataFrame) -> Result<(DataFrame, Vec<String>)> {
    let mut keep = Vec::new();
    let mut dropped = Vec::new();

    for col in df.get_columns() {
        if column_has_missing(col)? {
            dropped.push(col.name().to_string());
        } else {
            keep.push(col.name().to_string());
        }
    }

    if !dropped.is_empty() {
        log::warn!(
            "The following columns have been dropped as they contain missing values: {:?}",
            dropped
        );
    }

    let clean = df.select(keep)?;
    Ok((clean, dropped))
}

fn column_has_missing(col: &Column) -> Result<bool> {
    if col.null_count() > 0 {
        return Ok(true);
    }

    if matches!(col.dtype(), DataType::Float32 | DataType::Float64) {
        let cast = col.cast(&DataType::Float64)?;
        let values = cast.f64()?;
        for i in 0..values.len() {
            if let Some(v) = values.get(i) {
                if v.is_nan() {
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}
