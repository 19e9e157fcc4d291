//! Security-analysis building blocks: return and risk-ratio calculators over
//! date-indexed price tables, plus a reshaper for vendor two-row-header CSV
//! exports into normalized long format.
//!
//! All operations are stateless, synchronous transforms over in-memory
//! [`polars::frame::DataFrame`]s. Mathematically undefined results (log of a
//! non-positive price, division by zero volatility) propagate as NaN/infinity
//! rather than raising; structural problems (bad vendor layout, non-numeric
//! columns) are reported through [`FinmetricsError`].

pub mod data;
pub mod error;
pub mod metrics;

pub use error::{FinmetricsError, Result};
