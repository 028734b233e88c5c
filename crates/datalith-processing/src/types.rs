//! Core types shared across the analysis modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-column descriptive statistics over non-null numeric values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescriptiveStats {
    pub column: String,
    pub count: usize,
    pub null_count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub skewness: f64,
    /// Excess kurtosis (normal distribution sits at 0).
    pub kurtosis: f64,
}

/// Pearson correlation matrix over the numeric columns.
///
/// `values[i][j]` is the correlation between `columns[i]` and `columns[j]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns, if both are present.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// A pair of distinct columns whose absolute correlation crosses the
/// reporting threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub correlation: f64,
}

/// Normality assessment of a single numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub column: String,
    pub statistic: f64,
    pub p_value: f64,
    /// True when the normality hypothesis was not rejected at alpha = 0.05.
    pub looks_normal: bool,
}

/// Outlier counts for a single numeric column under the |z| > 3 rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlierSummary {
    pub column: String,
    pub outlier_count: usize,
    pub outlier_fraction: f64,
}

/// Everything the analyzer produces in one pass over a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsBundle {
    pub row_count: usize,
    pub column_count: usize,
    pub descriptive: Vec<DescriptiveStats>,
    pub correlations: CorrelationMatrix,
    pub strong_pairs: Vec<CorrelationPair>,
    /// Other numeric columns' correlation with the target, sorted descending
    /// by signed value. Empty when no target was given.
    pub target_ranking: Vec<(String, f64)>,
    pub distributions: Vec<DistributionSummary>,
    pub outliers: Vec<OutlierSummary>,
}

/// Rows flagged as anomalous by a detector, plus optional continuous scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Row indices into the input frame, ascending.
    pub indices: Vec<usize>,
    pub method: String,
    pub threshold: f64,
    /// Per-flagged-row anomaly scores; only the model-based detector
    /// produces these.
    pub scores: Option<Vec<f64>>,
}

impl AnomalyReport {
    pub fn count(&self) -> usize {
        self.indices.len()
    }
}

/// First-seen integer codes assigned to a high-cardinality string column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelMap {
    pub column: String,
    pub codes: HashMap<String, u32>,
}

impl LabelMap {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            codes: HashMap::new(),
        }
    }

    /// Code for a category, assigning the next code on first sight.
    pub fn encode(&mut self, value: &str) -> u32 {
        let next = self.codes.len() as u32;
        *self.codes.entry(value.to_string()).or_insert(next)
    }

    /// Code for an already-seen category.
    pub fn lookup(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_map_first_seen_codes() {
        let mut map = LabelMap::new("city");
        assert_eq!(map.encode("oslo"), 0);
        assert_eq!(map.encode("bergen"), 1);
        assert_eq!(map.encode("oslo"), 0);
        assert_eq!(map.lookup("bergen"), Some(1));
        assert_eq!(map.lookup("tromso"), None);
    }

    #[test]
    fn test_correlation_matrix_get() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![1.0, 0.5], vec![0.5, 1.0]],
        };
        assert_eq!(matrix.get("a", "b"), Some(0.5));
        assert_eq!(matrix.get("a", "missing"), None);
    }

    #[test]
    fn test_anomaly_report_count() {
        let report = AnomalyReport {
            indices: vec![2, 7, 9],
            method: "zscore".to_string(),
            threshold: 2.5,
            scores: None,
        };
        assert_eq!(report.count(), 3);
    }
}
