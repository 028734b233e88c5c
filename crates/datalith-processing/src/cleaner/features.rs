//! Feature synthesis.
//!
//! Appends one interaction feature over the first two numeric columns and a
//! squared feature for up to the first three numeric columns. Names are
//! deterministic, so re-running on already-synthesized output is a no-op.

use crate::error::{ProcessingError, Result};
use crate::utils::{numeric_column_names, values_with_fill};
use polars::prelude::*;
use tracing::debug;

const MAX_SQUARED_FEATURES: usize = 3;

/// Append synthesized numeric features.
///
/// A synthesized name matching an existing column is skipped (the feature was
/// already built on a previous pass); a synthesized name matching the target
/// column is a configuration error.
pub fn synthesize_features(df: &mut DataFrame, target: Option<&str>) -> Result<()> {
    let numeric = numeric_column_names(df);
    let base: Vec<String> = numeric
        .into_iter()
        .filter(|name| !is_synthesized(name))
        .collect();

    if base.len() >= 2 {
        let name = format!("{}_x_{}", base[0], base[1]);
        append_feature(df, target, &name, |df| {
            let a = values_with_fill(df.column(base[0].as_str())?.as_materialized_series(), 0.0)?;
            let b = values_with_fill(df.column(base[1].as_str())?.as_materialized_series(), 0.0)?;
            Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).collect())
        })?;
    }

    for source in base.iter().take(MAX_SQUARED_FEATURES) {
        let name = format!("{source}_squared");
        append_feature(df, target, &name, |df| {
            let values = values_with_fill(df.column(source.as_str())?.as_materialized_series(), 0.0)?;
            Ok(values.iter().map(|v| v * v).collect())
        })?;
    }
    Ok(())
}

fn is_synthesized(name: &str) -> bool {
    name.ends_with("_squared") || name.contains("_x_")
}

fn append_feature(
    df: &mut DataFrame,
    target: Option<&str>,
    name: &str,
    build: impl FnOnce(&DataFrame) -> Result<Vec<f64>>,
) -> Result<()> {
    if target == Some(name) {
        return Err(ProcessingError::FeatureNameCollision {
            name: name.to_string(),
        });
    }
    if df.column(name).is_ok() {
        debug!(column = %name, "synthesized feature already present, skipping");
        return Ok(());
    }
    let values = build(df)?;
    df.with_column(Series::new(name.into(), values))?;
    debug!(column = %name, "appended synthesized feature");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_interaction_and_squares() {
        let mut df = df![
            "a" => [1.0, 2.0, 3.0],
            "b" => [4.0, 5.0, 6.0],
        ]
        .unwrap();
        synthesize_features(&mut df, None).unwrap();

        assert_eq!(values(&df, "a_x_b"), vec![4.0, 10.0, 18.0]);
        assert_eq!(values(&df, "a_squared"), vec![1.0, 4.0, 9.0]);
        assert_eq!(values(&df, "b_squared"), vec![16.0, 25.0, 36.0]);
    }

    #[test]
    fn test_single_numeric_column_no_interaction() {
        let mut df = df!["a" => [2.0, 3.0]].unwrap();
        synthesize_features(&mut df, None).unwrap();
        assert!(df.column("a_x_b").is_err());
        assert_eq!(values(&df, "a_squared"), vec![4.0, 9.0]);
    }

    #[test]
    fn test_rerun_is_noop() {
        let mut df = df![
            "a" => [1.0, 2.0],
            "b" => [3.0, 4.0],
        ]
        .unwrap();
        synthesize_features(&mut df, None).unwrap();
        let width = df.width();
        synthesize_features(&mut df, None).unwrap();
        assert_eq!(df.width(), width);
    }

    #[test]
    fn test_target_collision_raises() {
        let mut df = df![
            "a" => [1.0, 2.0],
            "b" => [3.0, 4.0],
        ]
        .unwrap();
        let err = synthesize_features(&mut df, Some("a_x_b")).unwrap_err();
        assert_eq!(err.error_code(), "FEATURE_NAME_COLLISION");
    }

    #[test]
    fn test_squared_cap_at_three() {
        let mut df = df![
            "a" => [1.0], "b" => [1.0], "c" => [1.0], "d" => [1.0],
        ]
        .unwrap();
        synthesize_features(&mut df, None).unwrap();
        assert!(df.column("c_squared").is_ok());
        assert!(df.column("d_squared").is_err());
    }
}
