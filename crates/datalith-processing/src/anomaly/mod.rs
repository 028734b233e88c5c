//! Anomaly detection over numeric features.
//!
//! Three strategies behind one detector type: isolation-forest model scoring,
//! per-feature z-score thresholding, and per-feature interquartile-range
//! bounds. The threshold strategies flag a row when ANY feature trips its
//! bound; continuous scores exist only for the model-based strategy.

mod iforest;

pub use iforest::IsolationForest;

use crate::error::{ProcessingError, Result};
use crate::types::AnomalyReport;
use crate::utils::{mean_and_std, numeric_column_names, numeric_matrix, quartiles};
use polars::prelude::*;
use std::str::FromStr;
use tracing::{debug, info};

/// Expected anomalous fraction used to fit the isolation forest.
pub const DEFAULT_CONTAMINATION: f64 = 0.1;

/// Default z-score threshold for the z-score strategy.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.5;

const IQR_FACTOR: f64 = 1.5;

/// Detection strategy, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    IsolationForest,
    ZScore,
    IqrBounds,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IsolationForest => "isolation_forest",
            Self::ZScore => "zscore",
            Self::IqrBounds => "iqr",
        }
    }
}

impl FromStr for DetectionMethod {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "isolation_forest" => Ok(Self::IsolationForest),
            "zscore" => Ok(Self::ZScore),
            "iqr" => Ok(Self::IqrBounds),
            other => Err(ProcessingError::InvalidConfig(format!(
                "unknown detection method '{other}' (expected isolation_forest, zscore, or iqr)"
            ))),
        }
    }
}

/// Detects anomalous rows with the strategy chosen at construction.
pub struct AnomalyDetector {
    method: DetectionMethod,
    threshold: f64,
    seed: u64,
    forest: Option<IsolationForest>,
    fitted_features: Option<Vec<String>>,
}

impl AnomalyDetector {
    pub fn new(method: DetectionMethod) -> Self {
        Self {
            method,
            threshold: DEFAULT_Z_THRESHOLD,
            seed: 42,
            forest: None,
            fitted_features: None,
        }
    }

    /// Override the z-score threshold; ignored by the other strategies.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn method(&self) -> DetectionMethod {
        self.method
    }

    /// Fit the model-based strategy; a no-op for the threshold strategies.
    pub fn fit(&mut self, df: &DataFrame, features: Option<&[String]>) -> Result<()> {
        if self.method != DetectionMethod::IsolationForest {
            return Ok(());
        }
        let features = resolve_features(df, features);
        let matrix = numeric_matrix(df, &features)?;
        let mut forest = IsolationForest::with_defaults(self.seed);
        forest.fit(&matrix);
        info!(rows = matrix.len(), features = features.len(), "fitted anomaly model");
        self.forest = Some(forest);
        self.fitted_features = Some(features);
        Ok(())
    }

    /// Flag anomalous rows. The model-based strategy fits lazily on first
    /// use.
    pub fn detect(&mut self, df: &DataFrame, features: Option<&[String]>) -> Result<AnomalyReport> {
        let report = match self.method {
            DetectionMethod::IsolationForest => self.detect_model(df, features)?,
            DetectionMethod::ZScore => self.detect_zscore(df, features)?,
            DetectionMethod::IqrBounds => self.detect_iqr(df, features)?,
        };
        info!(
            method = self.method.as_str(),
            flagged = report.count(),
            rows = df.height(),
            "anomaly detection finished"
        );
        Ok(report)
    }

    /// Per-row continuous anomaly scores; only defined for the model-based
    /// strategy.
    pub fn score(&mut self, df: &DataFrame, features: Option<&[String]>) -> Result<Vec<f64>> {
        if self.method != DetectionMethod::IsolationForest {
            return Err(ProcessingError::ScoresUnavailable {
                method: self.method.as_str().to_string(),
            });
        }
        if self.forest.is_none() {
            self.fit(df, features)?;
        }
        let features = self
            .fitted_features
            .clone()
            .unwrap_or_else(|| resolve_features(df, features));
        let matrix = numeric_matrix(df, &features)?;
        let forest = self
            .forest
            .as_ref()
            .ok_or_else(|| ProcessingError::Internal("forest missing after fit".to_string()))?;
        Ok(matrix.iter().map(|row| forest.score(row)).collect())
    }

    fn detect_model(
        &mut self,
        df: &DataFrame,
        features: Option<&[String]>,
    ) -> Result<AnomalyReport> {
        if self.forest.is_none() {
            debug!("detector not yet fitted, fitting lazily");
            self.fit(df, features)?;
        }
        let features = self
            .fitted_features
            .clone()
            .unwrap_or_else(|| resolve_features(df, features));
        let matrix = numeric_matrix(df, &features)?;
        let forest = self
            .forest
            .as_ref()
            .ok_or_else(|| ProcessingError::Internal("forest missing after fit".to_string()))?;

        let mut indices = Vec::new();
        let mut scores = Vec::new();
        for (i, row) in matrix.iter().enumerate() {
            if forest.is_anomalous(row) {
                indices.push(i);
                scores.push(forest.score(row));
            }
        }
        Ok(AnomalyReport {
            indices,
            method: self.method.as_str().to_string(),
            threshold: DEFAULT_CONTAMINATION,
            scores: Some(scores),
        })
    }

    fn detect_zscore(&self, df: &DataFrame, features: Option<&[String]>) -> Result<AnomalyReport> {
        let features = resolve_features(df, features);
        let mut flagged = vec![false; df.height()];

        for name in &features {
            let series = df
                .column(name.as_str())
                .map_err(|_| ProcessingError::ColumnNotFound(name.clone()))?
                .as_materialized_series();
            let mean = series.mean().unwrap_or(0.0);
            let values = crate::utils::values_with_fill(series, mean)?;
            let (mean, std) = mean_and_std(&values);
            if std == 0.0 {
                continue;
            }
            for (i, v) in values.iter().enumerate() {
                if ((v - mean) / std).abs() > self.threshold {
                    flagged[i] = true;
                }
            }
        }

        Ok(AnomalyReport {
            indices: flagged_indices(&flagged),
            method: self.method.as_str().to_string(),
            threshold: self.threshold,
            scores: None,
        })
    }

    fn detect_iqr(&self, df: &DataFrame, features: Option<&[String]>) -> Result<AnomalyReport> {
        let features = resolve_features(df, features);
        let mut flagged = vec![false; df.height()];

        for name in &features {
            let series = df
                .column(name.as_str())
                .map_err(|_| ProcessingError::ColumnNotFound(name.clone()))?
                .as_materialized_series();
            let float_series = series.cast(&DataType::Float64)?;
            let present: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
            if present.is_empty() {
                continue;
            }
            let (q1, _, q3) = quartiles(&present);
            let iqr = q3 - q1;
            let lower = q1 - IQR_FACTOR * iqr;
            let upper = q3 + IQR_FACTOR * iqr;

            for (i, v) in float_series.f64()?.into_iter().enumerate() {
                if let Some(v) = v {
                    if v < lower || v > upper {
                        flagged[i] = true;
                    }
                }
            }
        }

        Ok(AnomalyReport {
            indices: flagged_indices(&flagged),
            method: self.method.as_str().to_string(),
            threshold: IQR_FACTOR,
            scores: None,
        })
    }
}

/// Rows of `df` named by a report's indices, in report order.
pub fn anomalous_rows(df: &DataFrame, report: &AnomalyReport) -> Result<DataFrame> {
    let idx: Vec<u32> = report.indices.iter().map(|&i| i as u32).collect();
    Ok(df.take(&IdxCa::from_vec("idx".into(), idx))?)
}

fn resolve_features(df: &DataFrame, features: Option<&[String]>) -> Vec<String> {
    match features {
        Some(f) => f.to_vec(),
        None => numeric_column_names(df),
    }
}

fn flagged_indices(flagged: &[bool]) -> Vec<usize> {
    flagged
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_outlier() -> DataFrame {
        let mut a: Vec<f64> = (0..40).map(|i| (i % 5) as f64).collect();
        a[7] = 1000.0;
        let b: Vec<f64> = (0..40).map(|i| (i % 3) as f64).collect();
        df!["a" => &a, "b" => &b].unwrap()
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "zscore".parse::<DetectionMethod>().unwrap(),
            DetectionMethod::ZScore
        );
        assert_eq!(
            "isolation_forest".parse::<DetectionMethod>().unwrap(),
            DetectionMethod::IsolationForest
        );
        let err = "magic".parse::<DetectionMethod>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_zscore_flags_outlier_row() {
        let df = frame_with_outlier();
        let mut detector = AnomalyDetector::new(DetectionMethod::ZScore);
        let report = detector.detect(&df, None).unwrap();
        assert!(report.indices.contains(&7));
        assert!(report.scores.is_none());
    }

    #[test]
    fn test_zscore_union_across_features() {
        let mut a = vec![0.0; 40];
        let mut b = vec![0.0; 40];
        for i in 0..40 {
            a[i] = (i % 4) as f64;
            b[i] = (i % 6) as f64;
        }
        a[3] = 500.0;
        b[11] = 500.0;
        let df = df!["a" => &a, "b" => &b].unwrap();

        let mut detector = AnomalyDetector::new(DetectionMethod::ZScore);
        let both = detector.detect(&df, None).unwrap();

        let df_a = df!["a" => &a].unwrap();
        let df_b = df!["b" => &b].unwrap();
        let only_a = detector.detect(&df_a, None).unwrap();
        let only_b = detector.detect(&df_b, None).unwrap();

        let mut union: Vec<usize> = only_a
            .indices
            .iter()
            .chain(only_b.indices.iter())
            .copied()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        union.sort_unstable();
        assert_eq!(both.indices, union);
    }

    #[test]
    fn test_iqr_flags_outlier_row() {
        let df = frame_with_outlier();
        let mut detector = AnomalyDetector::new(DetectionMethod::IqrBounds);
        let report = detector.detect(&df, None).unwrap();
        assert!(report.indices.contains(&7));
    }

    #[test]
    fn test_model_detect_fits_lazily_and_scores() {
        let df = frame_with_outlier();
        let mut detector = AnomalyDetector::new(DetectionMethod::IsolationForest);
        let report = detector.detect(&df, None).unwrap();
        assert!(report.scores.is_some());
        assert!(report.indices.contains(&7));
        assert_eq!(report.scores.as_ref().unwrap().len(), report.count());
    }

    #[test]
    fn test_score_raises_for_threshold_strategy() {
        let df = frame_with_outlier();
        let mut detector = AnomalyDetector::new(DetectionMethod::ZScore);
        let err = detector.score(&df, None).unwrap_err();
        assert_eq!(err.error_code(), "SCORES_UNAVAILABLE");
    }

    #[test]
    fn test_anomalous_rows_subset() {
        let df = frame_with_outlier();
        let mut detector = AnomalyDetector::new(DetectionMethod::ZScore);
        let report = detector.detect(&df, None).unwrap();
        let rows = anomalous_rows(&df, &report).unwrap();
        assert_eq!(rows.height(), report.count());
        assert_eq!(rows.width(), df.width());
    }
}
