//! Per-column descriptive statistics.

use crate::error::Result;
use crate::types::{DescriptiveStats, OutlierSummary};
use crate::utils::{is_numeric_dtype, mean_and_std, non_null_values, quartiles};
use polars::prelude::*;

/// Descriptive statistics for every numeric column.
///
/// Columns with fewer than two non-null values produce degenerate but
/// well-defined results (std and moments of 0) rather than failing.
pub fn describe_columns(df: &DataFrame) -> Result<Vec<DescriptiveStats>> {
    let mut out = Vec::new();
    for col in df.get_columns() {
        if !is_numeric_dtype(col.dtype()) {
            continue;
        }
        let series = col.as_materialized_series();
        let values = non_null_values(series)?;
        out.push(describe_values(col.name().as_str(), &values, series.null_count()));
    }
    Ok(out)
}

fn describe_values(name: &str, values: &[f64], null_count: usize) -> DescriptiveStats {
    let (mean, std) = mean_and_std(values);
    let (q1, median, q3) = quartiles(values);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let (skewness, kurtosis) = moments(values, mean, std);

    DescriptiveStats {
        column: name.to_string(),
        count: values.len(),
        null_count,
        mean,
        std,
        min: if values.is_empty() { 0.0 } else { min },
        max: if values.is_empty() { 0.0 } else { max },
        q1,
        median,
        q3,
        skewness,
        kurtosis,
    }
}

/// Sample skewness and excess kurtosis; zero for degenerate input.
pub fn moments(values: &[f64], mean: f64, std: f64) -> (f64, f64) {
    let n = values.len() as f64;
    if values.len() < 2 || std == 0.0 {
        return (0.0, 0.0);
    }
    let m3 = values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n;
    let m4 = values.iter().map(|v| ((v - mean) / std).powi(4)).sum::<f64>() / n;
    (m3, m4 - 3.0)
}

/// Count of values with |z-score| above 3 per numeric column.
pub fn count_outliers(df: &DataFrame) -> Result<Vec<OutlierSummary>> {
    let mut out = Vec::new();
    for col in df.get_columns() {
        if !is_numeric_dtype(col.dtype()) {
            continue;
        }
        let values = non_null_values(col.as_materialized_series())?;
        let (mean, std) = mean_and_std(&values);
        let count = if std == 0.0 {
            0
        } else {
            values
                .iter()
                .filter(|v| ((*v - mean) / std).abs() > 3.0)
                .count()
        };
        let fraction = if values.is_empty() {
            0.0
        } else {
            count as f64 / values.len() as f64
        };
        out.push(OutlierSummary {
            column: col.name().to_string(),
            outlier_count: count,
            outlier_fraction: fraction,
        });
    }
    Ok(out)
}
