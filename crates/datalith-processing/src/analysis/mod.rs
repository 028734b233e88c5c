//! Statistical analysis of a dataset.
//!
//! One `analyze` pass produces a [`StatisticsBundle`] with descriptive stats,
//! the correlation matrix and its strong pairs, an optional target ranking,
//! normality assessments, and outlier counts.

pub mod correlation;
pub mod descriptive;
pub mod hypothesis;
pub mod importance;
pub mod normality;

pub use correlation::{
    correlation_matrix, strong_pairs, target_ranking, STRONG_CORRELATION_THRESHOLD,
};
pub use descriptive::{count_outliers, describe_columns};
pub use hypothesis::{hypothesis_test, HypothesisTest, TestOutcome};
pub use importance::mutual_info_ranking;
pub use normality::{assess_normality, NORMALITY_ALPHA, NORMALITY_SAMPLE_CAP};

use crate::error::Result;
use crate::types::StatisticsBundle;
use crate::utils::{is_numeric_dtype, non_null_values};
use polars::prelude::*;
use tracing::info;

/// Computes a full statistics pass over a dataset.
#[derive(Debug, Clone, Default)]
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a dataset, optionally ranking numeric columns against a
    /// target. A target that is absent or non-numeric yields an empty
    /// ranking rather than an error.
    pub fn analyze(&self, df: &DataFrame, target: Option<&str>) -> Result<StatisticsBundle> {
        let descriptive = describe_columns(df)?;
        let correlations = correlation_matrix(df)?;
        let pairs = strong_pairs(&correlations);

        let ranking = match target {
            Some(name) => target_ranking(&correlations, name),
            None => Vec::new(),
        };

        let mut distributions = Vec::new();
        for col in df.get_columns() {
            if !is_numeric_dtype(col.dtype()) {
                continue;
            }
            let values = non_null_values(col.as_materialized_series())?;
            distributions.push(assess_normality(col.name().as_str(), &values));
        }

        let outliers = count_outliers(df)?;

        info!(
            rows = df.height(),
            numeric_columns = correlations.columns.len(),
            strong_pairs = pairs.len(),
            "analysis complete"
        );

        Ok(StatisticsBundle {
            row_count: df.height(),
            column_count: df.width(),
            descriptive,
            correlations,
            strong_pairs: pairs,
            target_ranking: ranking,
            distributions,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        let a: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let b: Vec<f64> = a.iter().map(|v| v * 2.0 + 1.0).collect();
        let c: Vec<f64> = (0..50).map(|i| ((i * 17) % 13) as f64).collect();
        df![
            "a" => &a,
            "b" => &b,
            "c" => &c,
            "label" => (0..50).map(|i| format!("g{}", i % 3)).collect::<Vec<_>>(),
        ]
        .unwrap()
    }

    #[test]
    fn test_analyze_produces_full_bundle() {
        let df = sample_frame();
        let bundle = StatisticalAnalyzer::new().analyze(&df, Some("a")).unwrap();

        assert_eq!(bundle.row_count, 50);
        assert_eq!(bundle.descriptive.len(), 3);
        assert_eq!(bundle.correlations.columns.len(), 3);
        assert_eq!(bundle.distributions.len(), 3);
        assert_eq!(bundle.outliers.len(), 3);

        // a and b are perfectly linearly related.
        assert_eq!(bundle.strong_pairs.len(), 1);
        assert_eq!(bundle.strong_pairs[0].first, "a");
        assert_eq!(bundle.strong_pairs[0].second, "b");

        // Target ranking excludes the target itself.
        assert_eq!(bundle.target_ranking.len(), 2);
        assert_eq!(bundle.target_ranking[0].0, "b");
    }

    #[test]
    fn test_analyze_without_target() {
        let df = sample_frame();
        let bundle = StatisticalAnalyzer::new().analyze(&df, None).unwrap();
        assert!(bundle.target_ranking.is_empty());
    }

    #[test]
    fn test_analyze_non_numeric_target_yields_empty_ranking() {
        let df = sample_frame();
        let bundle = StatisticalAnalyzer::new().analyze(&df, Some("label")).unwrap();
        assert!(bundle.target_ranking.is_empty());
    }
}
