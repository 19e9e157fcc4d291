use crate::error::{FinmetricsError, Result};
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| FinmetricsError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a headerless CSV with schema inference disabled, so every cell
    /// stays a string. The vendor two-row-header layout mixes identifiers,
    /// labels and data in the same columns, so per-column types are useless.
    pub fn load_raw<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(false)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| FinmetricsError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a date-indexed price matrix and split off the date column, leaving
    /// only the instrument columns for the return calculators.
    ///
    /// Null values are reported but do not fail the load; excluding columns
    /// with missing prices is the caller's decision (see
    /// [`crate::data::drop_null_columns`]).
    pub fn load_price_matrix<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = Self::load(path)?;

        let df = match Self::detect_datetime_column(&df) {
            Some(date_col) => df.drop(&date_col)?,
            None => df,
        };

        let null_report = Self::check_nulls(&df);
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }

    /// Count null values per column; empty when the table is complete.
    pub fn check_nulls(df: &DataFrame) -> Vec<(String, usize)> {
        let mut null_report = Vec::new();

        for col in df.get_columns() {
            let null_count = col.null_count();
            if null_count > 0 {
                null_report.push((col.name().to_string(), null_count));
            }
        }

        null_report
    }

    fn detect_datetime_column(df: &DataFrame) -> Option<String> {
        let datetime_aliases = ["date", "datetime", "time", "timestamp", "Date", "DateTime"];
        let columns = df.get_column_names();
        for alias in datetime_aliases {
            if columns.iter().any(|col| col.as_str() == alias) {
                return Some(alias.to_string());
            }
        }
        None
    }
}
