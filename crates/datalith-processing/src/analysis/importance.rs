//! Mutual-information feature ranking.
//!
//! Scores each numeric feature against a numeric target with a plug-in
//! mutual-information estimate over an equal-width binning of the values.
//! Low-cardinality targets are treated as class labels directly; continuous
//! targets are binned like the features.

use crate::error::Result;
use crate::utils::{is_numeric_dtype, numeric_column_names};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Number of equal-width bins used to discretize continuous values.
const MI_BINS: usize = 10;

/// Distinct-value count at or below which the target is treated as discrete
/// class labels.
const DISCRETE_TARGET_MAX: usize = 20;

/// Rank numeric features by mutual information with the target, descending.
///
/// Returns an empty ranking when the target column is absent or non-numeric.
pub fn mutual_info_ranking(df: &DataFrame, target: &str) -> Result<Vec<(String, f64)>> {
    let target_col = match df.column(target) {
        Ok(col) => col,
        Err(_) => {
            debug!(%target, "target column absent, returning empty ranking");
            return Ok(Vec::new());
        }
    };
    if !is_numeric_dtype(target_col.dtype()) {
        debug!(%target, "target column is not numeric, returning empty ranking");
        return Ok(Vec::new());
    }

    let target_series = target_col.as_materialized_series();
    let target_values: Vec<Option<f64>> = target_series
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .collect();

    let distinct = target_series.n_unique()?;
    let discrete_target = distinct <= DISCRETE_TARGET_MAX;
    debug!(%target, distinct, discrete_target, "selected information measure");

    let target_labels = if discrete_target {
        label_by_value(&target_values)
    } else {
        label_by_bin(&target_values)
    };

    let mut ranking = Vec::new();
    for name in numeric_column_names(df) {
        if name == target {
            continue;
        }
        let values: Vec<Option<f64>> = df
            .column(name.as_str())?
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect();
        let feature_labels = label_by_bin(&values);
        let score = mutual_information(&feature_labels, &target_labels);
        ranking.push((name, score));
    }

    ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(ranking)
}

/// Assign each distinct value its own label; nulls get no label.
fn label_by_value(values: &[Option<f64>]) -> Vec<Option<usize>> {
    let mut seen: HashMap<u64, usize> = HashMap::new();
    values
        .iter()
        .map(|v| {
            v.map(|v| {
                let key = v.to_bits();
                let next = seen.len();
                *seen.entry(key).or_insert(next)
            })
        })
        .collect()
}

/// Equal-width binning over the observed range; nulls get no label.
fn label_by_bin(values: &[Option<f64>]) -> Vec<Option<usize>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let min = present.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = present.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / MI_BINS as f64;

    values
        .iter()
        .map(|v| {
            v.map(|v| {
                if width == 0.0 || !width.is_finite() {
                    0
                } else {
                    (((v - min) / width) as usize).min(MI_BINS - 1)
                }
            })
        })
        .collect()
}

/// Plug-in mutual information over paired labels, skipping rows where either
/// side is missing. Non-negative by construction.
fn mutual_information(a: &[Option<usize>], b: &[Option<usize>]) -> f64 {
    let pairs: Vec<(usize, usize)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.is_empty() {
        return 0.0;
    }
    let n = pairs.len() as f64;

    let mut joint: HashMap<(usize, usize), f64> = HashMap::new();
    let mut marginal_a: HashMap<usize, f64> = HashMap::new();
    let mut marginal_b: HashMap<usize, f64> = HashMap::new();
    for &(x, y) in &pairs {
        *joint.entry((x, y)).or_insert(0.0) += 1.0;
        *marginal_a.entry(x).or_insert(0.0) += 1.0;
        *marginal_b.entry(y).or_insert(0.0) += 1.0;
    }

    let mut mi = 0.0;
    for (&(x, y), &count) in &joint {
        let p_xy = count / n;
        let p_x = marginal_a[&x] / n;
        let p_y = marginal_b[&y] / n;
        mi += p_xy * (p_xy / (p_x * p_y)).ln();
    }
    mi.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_target_returns_empty() {
        let df = df!["a" => [1.0, 2.0]].unwrap();
        let ranking = mutual_info_ranking(&df, "missing").unwrap();
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_non_numeric_target_returns_empty() {
        let df = df![
            "a" => [1.0, 2.0],
            "label" => ["x", "y"],
        ]
        .unwrap();
        let ranking = mutual_info_ranking(&df, "label").unwrap();
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_informative_feature_outranks_noise() {
        let n = 200;
        let target: Vec<f64> = (0..n).map(|i| (i % 2) as f64).collect();
        // "signal" is a deterministic function of the target; "noise" cycles
        // independently of it.
        let signal: Vec<f64> = target.iter().map(|t| t * 10.0).collect();
        let noise: Vec<f64> = (0..n).map(|i| (i % 7) as f64).collect();
        let df = df![
            "signal" => &signal,
            "noise" => &noise,
            "y" => &target,
        ]
        .unwrap();

        let ranking = mutual_info_ranking(&df, "y").unwrap();
        assert_eq!(ranking[0].0, "signal");
        assert!(ranking[0].1 > ranking[1].1);
    }

    #[test]
    fn test_scores_non_negative() {
        let df = df![
            "a" => [1.0, 5.0, 2.0, 8.0, 3.0],
            "y" => [0.0, 1.0, 0.0, 1.0, 0.0],
        ]
        .unwrap();
        for (_, score) in mutual_info_ranking(&df, "y").unwrap() {
            assert!(score >= 0.0);
        }
    }
}
