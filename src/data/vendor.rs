use crate::error::{FinmetricsError, Result};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Expected label row of every vendor column pair.
const DATE_LABEL: &str = "Date";
const PRICE_LABEL: &str = "PX_LAST";

/// Serial 0 in the spreadsheet day-count convention. Offsetting the epoch by
/// two days absorbs the phantom 1900-02-29, so modern serials line up with
/// what the exporting spreadsheet displays.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// One row of the normalized long format produced by the reshaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeltedRecord {
    pub product: String,
    pub date: String,
    pub price: f64,
}

/// Reshapes a wide, two-row-header vendor export into long format.
///
/// Expected input layout (read headerless, all cells as strings):
///
/// ```text
/// bb ticker  | (empty)   | bb ticker  | (empty)
/// Date       | PX_LAST   | Date       | PX_LAST
/// dd/mm/yyyy | float     | dd/mm/yyyy | float
/// ```
///
/// Entirely blank columns (separators in the export) are discarded before any
/// shape check. Validation is all-or-nothing: a label mismatch or an odd
/// column count fails the whole input with [`FinmetricsError::Format`] and no
/// rows are emitted.
pub struct VendorReshaper;

impl VendorReshaper {
    /// Reshape a raw vendor export into a `(product, date, price)` DataFrame,
    /// one block of rows per identifier, concatenated in block order.
    pub fn reshape(raw: &DataFrame) -> Result<DataFrame> {
        let records = Self::melt(raw)?;

        let mut products = Vec::with_capacity(records.len());
        let mut dates = Vec::with_capacity(records.len());
        let mut prices = Vec::with_capacity(records.len());
        for record in records {
            products.push(record.product);
            dates.push(record.date);
            prices.push(record.price);
        }

        let df = DataFrame::new(vec![
            Column::new("product".into(), products),
            Column::new("date".into(), dates),
            Column::new("price".into(), prices),
        ])?;

        Ok(df)
    }

    /// Reshape into typed records instead of a DataFrame.
    pub fn melt(raw: &DataFrame) -> Result<Vec<MeltedRecord>> {
        let table = Self::drop_blank_columns(raw)?;
        Self::validate_layout(&table)?;

        let height = table.height();
        let mut records = Vec::new();

        for pair in 0..table.width() / 2 {
            let date_idx = pair * 2;
            let price_idx = date_idx + 1;

            let product = Self::str_cell(&table, 0, date_idx)?.ok_or_else(|| {
                FinmetricsError::Format(format!("column pair {}: missing identifier", pair))
            })?;

            for row in 2..height {
                let date_raw = Self::str_cell(&table, row, date_idx)?;
                let price_raw = Self::str_cell(&table, row, price_idx)?;

                // Rows with either cell missing are dropped, matching the
                // per-block dropna of the export.
                let (date_raw, price_raw) = match (date_raw, price_raw) {
                    (Some(d), Some(p)) => (d, p),
                    _ => continue,
                };

                let price: f64 = price_raw.trim().parse().map_err(|_| {
                    FinmetricsError::Format(format!(
                        "unparsable price {:?} at row {} for product {}",
                        price_raw, row, product
                    ))
                })?;

                records.push(MeltedRecord {
                    product: product.clone(),
                    date: normalise_date(&date_raw)?,
                    price,
                });
            }
        }

        Ok(records)
    }

    /// Discard columns with no content at all (blank separators).
    fn drop_blank_columns(raw: &DataFrame) -> Result<DataFrame> {
        let mut keep = Vec::new();

        for (idx, col) in raw.get_columns().iter().enumerate() {
            let mut has_content = false;
            for row in 0..raw.height() {
                if Self::str_cell(raw, row, idx)?.is_some() {
                    has_content = true;
                    break;
                }
            }
            if has_content {
                keep.push(col.name().to_string());
            }
        }

        Ok(raw.select(keep)?)
    }

    fn validate_layout(table: &DataFrame) -> Result<()> {
        if table.height() < 3 {
            return Err(FinmetricsError::Format(format!(
                "expected identifier row, label row and data rows, found {} rows",
                table.height()
            )));
        }

        if table.width() % 2 != 0 {
            return Err(FinmetricsError::Format(format!(
                "expected Date/{} column pairs, found an odd number of columns ({})",
                PRICE_LABEL,
                table.width()
            )));
        }

        for pair in 0..table.width() / 2 {
            let date_label = Self::str_cell(table, 1, pair * 2)?;
            let price_label = Self::str_cell(table, 1, pair * 2 + 1)?;

            let labels_ok = date_label.as_deref() == Some(DATE_LABEL)
                && price_label.as_deref() == Some(PRICE_LABEL);
            if !labels_ok {
                return Err(FinmetricsError::Format(format!(
                    "column pair {}: expected labels [{:?}, {:?}], found [{:?}, {:?}]",
                    pair, DATE_LABEL, PRICE_LABEL, date_label, price_label
                )));
            }
        }

        Ok(())
    }

    /// Read a cell as text; blank and whitespace-only cells count as missing.
    fn str_cell(table: &DataFrame, row: usize, col: usize) -> Result<Option<String>> {
        let column = &table.get_columns()[col];
        let values = column.str().map_err(|_| {
            FinmetricsError::Format(format!(
                "column {} ({}) is not text; vendor input must be read without schema inference",
                col,
                column.name()
            ))
        })?;

        match values.get(row) {
            Some(v) if !v.trim().is_empty() => Ok(Some(v.to_string())),
            _ => Ok(None),
        }
    }
}

/// Normalize a raw vendor date cell to `YYYY/MM/DD` text.
///
/// A value of exactly 10 characters is assumed to already be a text date and
/// passes through unchanged (no further well-formedness check, matching the
/// export contract); anything else is treated as a spreadsheet day serial.
fn normalise_date(raw: &str) -> Result<String> {
    if raw.len() == 10 {
        return Ok(raw.to_string());
    }

    let serial: i64 = raw
        .trim()
        .parse()
        .map_err(|_| FinmetricsError::Format(format!("unparsable date serial {:?}", raw)))?;

    let date = excel_serial_to_date(serial).ok_or_else(|| {
        FinmetricsError::Format(format!("date serial {} is out of range", serial))
    })?;

    Ok(date.format("%Y/%m/%d").to_string())
}

/// Convert a spreadsheet day-serial number into a calendar date.
///
/// Serial 0 is 1899-12-30, so serial 1 maps to 1899-12-31. Returns `None`
/// when the serial falls outside chrono's representable range.
pub fn excel_serial_to_date(serial: i64) -> Option<NaiveDate> {
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::try_days(serial)?)
}
