//! Pearson correlation over numeric columns.

use crate::error::Result;
use crate::types::{CorrelationMatrix, CorrelationPair};
use crate::utils::numeric_column_names;
use polars::prelude::*;

/// Absolute correlation above which a pair is reported as strong.
pub const STRONG_CORRELATION_THRESHOLD: f64 = 0.70;

/// Pairwise Pearson correlation matrix over the numeric columns.
///
/// Rows with a null in either column of a pair are skipped for that pair.
/// The matrix is symmetric with a unit diagonal; degenerate pairs (fewer
/// than two complete rows, or zero variance) correlate at 0.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let columns = numeric_column_names(df);
    let mut data: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in &columns {
        let series = df.column(name.as_str())?.as_materialized_series();
        let float_series = series.cast(&DataType::Float64)?;
        data.push(float_series.f64()?.into_iter().collect());
    }

    let n = columns.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pairwise_pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Every unordered pair (i < j) whose absolute correlation crosses the
/// strong-pair threshold.
pub fn strong_pairs(matrix: &CorrelationMatrix) -> Vec<CorrelationPair> {
    let mut pairs = Vec::new();
    let n = matrix.columns.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let r = matrix.values[i][j];
            if r.abs() > STRONG_CORRELATION_THRESHOLD {
                pairs.push(CorrelationPair {
                    first: matrix.columns[i].clone(),
                    second: matrix.columns[j].clone(),
                    correlation: r,
                });
            }
        }
    }
    pairs
}

/// Correlation of every other numeric column with the target, sorted
/// descending by signed value. Empty when the target is absent from the
/// matrix.
pub fn target_ranking(matrix: &CorrelationMatrix, target: &str) -> Vec<(String, f64)> {
    let Some(t) = matrix.columns.iter().position(|c| c == target) else {
        return Vec::new();
    };
    let mut ranking: Vec<(String, f64)> = matrix
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != t)
        .map(|(i, name)| (name.clone(), matrix.values[t][i]))
        .collect();
    ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranking
}
