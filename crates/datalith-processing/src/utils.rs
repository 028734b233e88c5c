//! Shared utilities for tabular processing.
//!
//! Column-kind helpers and small numeric routines used across the cleaner,
//! analyzer, and anomaly detector.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;

// =============================================================================
// Column kind helpers
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date/time type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Names of all numeric columns, in current column order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

// =============================================================================
// Value extraction
// =============================================================================

/// Non-null values of a column as f64, in row order.
pub fn non_null_values(series: &Series) -> Result<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().flatten().collect())
}

/// All values of a column as f64, nulls replaced with `fill`, in row order.
pub fn values_with_fill(series: &Series, fill: f64) -> Result<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill))
        .collect())
}

/// Row-major matrix over the given columns, nulls replaced with the column mean.
pub fn numeric_matrix(df: &DataFrame, features: &[String]) -> Result<Vec<Vec<f64>>> {
    let mut columns = Vec::with_capacity(features.len());
    for name in features {
        let series = df
            .column(name.as_str())
            .map_err(|_| ProcessingError::ColumnNotFound(name.clone()))?
            .as_materialized_series();
        let mean = series.mean().unwrap_or(0.0);
        columns.push(values_with_fill(series, mean)?);
    }

    let n_rows = df.height();
    let mut rows = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        rows.push(columns.iter().map(|col| col[i]).collect());
    }
    Ok(rows)
}

// =============================================================================
// Numeric routines
// =============================================================================

/// Mean and population standard deviation. Empty input yields (0, 0).
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Quartiles (q1, median, q3) via the sorted-index convention.
///
/// Empty input yields (0, 0, 0); callers treat that as a degenerate sentinel.
pub fn quartiles(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let at = |q: f64| sorted[((n as f64 * q) as usize).min(n - 1)];
    (at(0.25), at(0.50), at(0.75))
}

/// Most frequent non-null string value; ties break on first occurrence.
pub fn string_mode(series: &Series) -> Option<String> {
    let ca = series.str().ok()?;
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for value in ca.into_iter().flatten() {
        let entry = counts.entry(value).or_insert(0);
        if *entry == 0 {
            order.push(value);
        }
        *entry += 1;
    }
    // Strict comparison over first-seen order keeps the earliest value on
    // ties.
    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}
