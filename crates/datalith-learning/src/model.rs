//! Model training and evaluation.
//!
//! [`ModelTrainer`] fits one of the supported estimator families to a
//! feature/target split, auto-detecting regression vs. classification from
//! the target column, and evaluates with the standard metric set. The
//! feature-column list is frozen at fit time; later predictions must present
//! exactly those columns.

use crate::error::{LearningError, Result};
use crate::metrics::{classification_metrics, regression_metrics};
use crate::types::{ModelKind, ModelParams, ProblemKind};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Distinct-value ceiling for classification auto-detection. A fixed,
/// documented threshold kept for compatibility with prior behavior.
pub const CLASSIFICATION_MAX_CLASSES: usize = 20;

const CV_FOLDS: usize = 5;

/// Whether a gradient-boosting backend is compiled in. Resolved once.
pub fn gradient_boosting_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    // No gradient-boosting backend ships with this build.
    *AVAILABLE.get_or_init(|| false)
}

type ForestRegressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type ForestClassifier = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;
type LinearRegressor = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type LogisticClassifier = LogisticRegression<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// A fitted estimator, one variant per (model kind, problem kind) pairing.
#[derive(Debug, Serialize, Deserialize)]
pub enum FittedEstimator {
    ForestRegressor(ForestRegressor),
    ForestClassifier(ForestClassifier),
    LinearRegressor(LinearRegressor),
    LogisticClassifier(LogisticClassifier),
}

impl FittedEstimator {
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>> {
        let map_err = |e: smartcore::error::Failed| LearningError::PredictionFailed(e.to_string());
        match self {
            Self::ForestRegressor(m) => m.predict(x).map_err(map_err),
            Self::LinearRegressor(m) => m.predict(x).map_err(map_err),
            Self::ForestClassifier(m) => Ok(m
                .predict(x)
                .map_err(map_err)?
                .into_iter()
                .map(f64::from)
                .collect()),
            Self::LogisticClassifier(m) => Ok(m
                .predict(x)
                .map_err(map_err)?
                .into_iter()
                .map(f64::from)
                .collect()),
        }
    }
}

/// Everything produced by a fit: the estimator plus its captured metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub kind: ModelKind,
    pub problem: ProblemKind,
    pub target: String,
    /// Feature columns frozen at fit time, in training order.
    pub features: Vec<String>,
    /// Class labels in code order; empty for regression.
    pub classes: Vec<String>,
    pub estimator: FittedEstimator,
    /// Permutation importance, descending; empty for linear models.
    pub importance: Vec<(String, f64)>,
}

/// Trains and evaluates a single model.
pub struct ModelTrainer {
    kind: ModelKind,
    params: ModelParams,
    forced_problem: Option<ProblemKind>,
    artifact: Option<ModelArtifact>,
}

impl ModelTrainer {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            params: ModelParams::default(),
            forced_problem: None,
            artifact: None,
        }
    }

    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Force the problem kind instead of auto-detecting it at fit time.
    pub fn with_problem(mut self, problem: ProblemKind) -> Self {
        self.forced_problem = Some(problem);
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn artifact(&self) -> Option<&ModelArtifact> {
        self.artifact.as_ref()
    }

    /// Restore a previously fitted artifact into this trainer.
    pub fn with_artifact(mut self, artifact: ModelArtifact) -> Self {
        self.kind = artifact.kind;
        self.forced_problem = Some(artifact.problem);
        self.artifact = Some(artifact);
        self
    }

    /// Fit the model. Features default to every numeric column except the
    /// target; the resolved list is frozen into the artifact.
    pub fn fit(
        &mut self,
        df: &DataFrame,
        target: &str,
        features: Option<&[String]>,
    ) -> Result<()> {
        if self.kind == ModelKind::GradientBoosted && !gradient_boosting_available() {
            return Err(LearningError::BackendUnavailable {
                kind: self.kind.as_str().to_string(),
                reason: "no gradient boosting backend is compiled in".to_string(),
            });
        }

        let target_col = df
            .column(target)
            .map_err(|_| LearningError::TargetNotFound(target.to_string()))?
            .as_materialized_series()
            .clone();

        let features = match features {
            Some(f) => f.to_vec(),
            None => numeric_features(df, target),
        };
        if features.is_empty() {
            return Err(LearningError::TrainingFailed(
                "no numeric feature columns available".to_string(),
            ));
        }

        let problem = match self.forced_problem {
            Some(p) => p,
            None => detect_problem(&target_col)?,
        };
        info!(
            kind = self.kind.as_str(),
            problem = problem.as_str(),
            %target,
            features = features.len(),
            "fitting model"
        );

        let x_rows = feature_matrix(df, &features)?;
        let (y_reg, y_cls, classes) = target_vectors(&target_col, problem)?;

        let estimator = fit_estimator(self.kind, problem, &self.params, &x_rows, &y_reg, &y_cls)?;

        self.cross_validate(problem, &x_rows, &y_reg, &y_cls);

        let importance = if self.kind == ModelKind::Tree {
            permutation_importance(
                &estimator,
                problem,
                &features,
                &x_rows,
                &y_reg,
                &y_cls,
                self.params.seed,
            )?
        } else {
            Vec::new()
        };

        self.artifact = Some(ModelArtifact {
            kind: self.kind,
            problem,
            target: target.to_string(),
            features,
            classes,
            estimator,
            importance,
        });
        Ok(())
    }

    /// Predictions for new rows. Classification predictions are class codes;
    /// use [`ModelTrainer::predict_labels`] for the original labels.
    pub fn predict(&self, df: &DataFrame) -> Result<Vec<f64>> {
        let artifact = self.artifact.as_ref().ok_or(LearningError::NotTrained)?;
        for name in &artifact.features {
            if df.column(name).is_err() {
                return Err(LearningError::SchemaMismatch(name.clone()));
            }
        }
        if df.height() == 0 {
            return Err(LearningError::PredictionFailed(
                "cannot predict on an empty frame".to_string(),
            ));
        }
        let x_rows = feature_matrix(df, &artifact.features)?;
        let x = dense_matrix(&x_rows)?;
        artifact.estimator.predict(&x)
    }

    /// Class-label predictions; only defined for classification artifacts.
    pub fn predict_labels(&self, df: &DataFrame) -> Result<Vec<String>> {
        let artifact = self.artifact.as_ref().ok_or(LearningError::NotTrained)?;
        if artifact.problem != ProblemKind::Classification {
            return Err(LearningError::PredictionFailed(
                "label predictions are only defined for classification models".to_string(),
            ));
        }
        let codes = self.predict(df)?;
        Ok(codes
            .into_iter()
            .map(|c| {
                artifact
                    .classes
                    .get(c as usize)
                    .cloned()
                    .unwrap_or_else(|| format!("{c}"))
            })
            .collect())
    }

    /// Evaluate against a labelled frame with the standard metric set.
    pub fn evaluate(&self, df: &DataFrame, target: &str) -> Result<HashMap<String, f64>> {
        let artifact = self.artifact.as_ref().ok_or(LearningError::NotTrained)?;
        let target_col = df
            .column(target)
            .map_err(|_| LearningError::TargetNotFound(target.to_string()))?
            .as_materialized_series()
            .clone();
        let predicted = self.predict(df)?;

        match artifact.problem {
            ProblemKind::Regression => {
                let actual = numeric_values(&target_col)?;
                Ok(regression_metrics(&actual, &predicted))
            }
            ProblemKind::Classification => {
                let actual = encode_with_classes(&target_col, &artifact.classes)?;
                let predicted: Vec<u32> = predicted.into_iter().map(|p| p as u32).collect();
                Ok(classification_metrics(&actual, &predicted))
            }
        }
    }

    /// Permutation importance captured at fit time, descending. Empty for
    /// linear models; an error before fit.
    pub fn feature_importance(&self) -> Result<Vec<(String, f64)>> {
        let artifact = self.artifact.as_ref().ok_or(LearningError::NotTrained)?;
        Ok(artifact.importance.clone())
    }

    /// 5-fold cross-validation for diagnostic logging; failures are logged
    /// and never abort training.
    fn cross_validate(&self, problem: ProblemKind, x: &[Vec<f64>], y_reg: &[f64], y_cls: &[u32]) {
        match cross_validation_score(self.kind, problem, &self.params, x, y_reg, y_cls) {
            Ok(Some(score)) => {
                info!(
                    folds = CV_FOLDS,
                    score = format!("{score:.4}"),
                    "cross-validation score"
                );
            }
            Ok(None) => debug!("too few rows for cross-validation, skipping"),
            Err(e) => warn!(error = %e, "cross-validation failed, continuing"),
        }
    }
}

fn numeric_features(df: &DataFrame, target: &str) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric() && col.name().as_str() != target)
        .map(|col| col.name().to_string())
        .collect()
}

/// Classification when the target is of an integer kind with few distinct
/// values; regression otherwise.
fn detect_problem(target: &Series) -> Result<ProblemKind> {
    let discrete_kind = target.dtype().is_integer() || target.dtype() == &DataType::Boolean;
    if discrete_kind && target.n_unique()? <= CLASSIFICATION_MAX_CLASSES {
        Ok(ProblemKind::Classification)
    } else {
        Ok(ProblemKind::Regression)
    }
}

/// Row-major feature matrix; nulls are filled with the column mean.
fn feature_matrix(df: &DataFrame, features: &[String]) -> Result<Vec<Vec<f64>>> {
    let mut columns = Vec::with_capacity(features.len());
    for name in features {
        let series = df
            .column(name.as_str())
            .map_err(|_| LearningError::SchemaMismatch(name.clone()))?
            .as_materialized_series()
            .clone();
        let mean = series.mean().unwrap_or(0.0);
        let values: Vec<f64> = series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(mean))
            .collect();
        columns.push(values);
    }
    let n_rows = df.height();
    let mut rows = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        rows.push(columns.iter().map(|col| col[i]).collect());
    }
    Ok(rows)
}

fn numeric_values(series: &Series) -> Result<Vec<f64>> {
    Ok(series
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}

/// Target vectors for both problem kinds; classes are label strings in
/// first-seen order, empty for regression.
fn target_vectors(
    target: &Series,
    problem: ProblemKind,
) -> Result<(Vec<f64>, Vec<u32>, Vec<String>)> {
    match problem {
        ProblemKind::Regression => Ok((numeric_values(target)?, Vec::new(), Vec::new())),
        ProblemKind::Classification => {
            let mut classes: Vec<String> = Vec::new();
            let mut index: HashMap<String, u32> = HashMap::new();
            let mut codes = Vec::with_capacity(target.len());
            for i in 0..target.len() {
                let label = format!("{}", target.get(i)?);
                let code = match index.get(&label) {
                    Some(&c) => c,
                    None => {
                        let c = classes.len() as u32;
                        index.insert(label.clone(), c);
                        classes.push(label);
                        c
                    }
                };
                codes.push(code);
            }
            Ok((Vec::new(), codes, classes))
        }
    }
}

/// Codes for evaluation labels against the fit-time class list; unseen labels
/// get a code past the end so they never count as correct.
fn encode_with_classes(target: &Series, classes: &[String]) -> Result<Vec<u32>> {
    let index: HashMap<&str, u32> = classes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i as u32))
        .collect();
    let mut codes = Vec::with_capacity(target.len());
    for i in 0..target.len() {
        let label = format!("{}", target.get(i)?);
        codes.push(
            index
                .get(label.as_str())
                .copied()
                .unwrap_or(classes.len() as u32),
        );
    }
    Ok(codes)
}

fn dense_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>> {
    // from_2d_vec panics on empty input, so guard before constructing.
    if rows.is_empty() || rows[0].is_empty() {
        return Err(LearningError::TrainingFailed(
            "cannot build a matrix from an empty frame".to_string(),
        ));
    }
    Ok(DenseMatrix::from_2d_vec(&rows.to_vec()))
}

fn fit_estimator(
    kind: ModelKind,
    problem: ProblemKind,
    params: &ModelParams,
    x_rows: &[Vec<f64>],
    y_reg: &[f64],
    y_cls: &[u32],
) -> Result<FittedEstimator> {
    let x = dense_matrix(x_rows)?;
    let map_err = |e: smartcore::error::Failed| LearningError::TrainingFailed(e.to_string());

    match (kind, problem) {
        (ModelKind::Tree, ProblemKind::Regression) => {
            let mut p = RandomForestRegressorParameters::default()
                .with_n_trees(params.n_estimators)
                .with_seed(params.seed);
            if let Some(depth) = params.max_depth {
                p = p.with_max_depth(depth as u16);
            }
            RandomForestRegressor::fit(&x, &y_reg.to_vec(), p)
                .map(FittedEstimator::ForestRegressor)
                .map_err(map_err)
        }
        (ModelKind::Tree, ProblemKind::Classification) => {
            let mut p = RandomForestClassifierParameters::default()
                .with_n_trees(params.n_estimators as u16)
                .with_seed(params.seed);
            if let Some(depth) = params.max_depth {
                p = p.with_max_depth(depth as u16);
            }
            RandomForestClassifier::fit(&x, &y_cls.to_vec(), p)
                .map(FittedEstimator::ForestClassifier)
                .map_err(map_err)
        }
        (ModelKind::Linear, ProblemKind::Regression) => {
            LinearRegression::fit(&x, &y_reg.to_vec(), LinearRegressionParameters::default())
                .map(FittedEstimator::LinearRegressor)
                .map_err(map_err)
        }
        (ModelKind::Linear, ProblemKind::Classification) => {
            LogisticRegression::fit(&x, &y_cls.to_vec(), LogisticRegressionParameters::default())
                .map(FittedEstimator::LogisticClassifier)
                .map_err(map_err)
        }
        (ModelKind::GradientBoosted, _) => Err(LearningError::BackendUnavailable {
            kind: kind.as_str().to_string(),
            reason: "no gradient boosting backend is compiled in".to_string(),
        }),
    }
}

/// Mean out-of-fold score (R² for regression, accuracy for classification),
/// or None when there are too few rows to form folds.
fn cross_validation_score(
    kind: ModelKind,
    problem: ProblemKind,
    params: &ModelParams,
    x: &[Vec<f64>],
    y_reg: &[f64],
    y_cls: &[u32],
) -> Result<Option<f64>> {
    let n = x.len();
    if n < CV_FOLDS * 2 {
        return Ok(None);
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(params.seed);
    indices.shuffle(&mut rng);

    let fold_size = n / CV_FOLDS;
    let mut scores = Vec::with_capacity(CV_FOLDS);
    for fold in 0..CV_FOLDS {
        let start = fold * fold_size;
        let end = if fold == CV_FOLDS - 1 { n } else { start + fold_size };
        let holdout: Vec<usize> = indices[start..end].to_vec();
        let train: Vec<usize> = indices[..start]
            .iter()
            .chain(indices[end..].iter())
            .copied()
            .collect();

        let x_train: Vec<Vec<f64>> = train.iter().map(|&i| x[i].clone()).collect();
        let x_test: Vec<Vec<f64>> = holdout.iter().map(|&i| x[i].clone()).collect();
        let y_reg_train: Vec<f64> = train.iter().map(|&i| *y_reg.get(i).unwrap_or(&0.0)).collect();
        let y_cls_train: Vec<u32> = train.iter().map(|&i| *y_cls.get(i).unwrap_or(&0)).collect();

        let estimator = fit_estimator(kind, problem, params, &x_train, &y_reg_train, &y_cls_train)?;
        let predicted = estimator.predict(&dense_matrix(&x_test)?)?;

        let score = match problem {
            ProblemKind::Regression => {
                let actual: Vec<f64> = holdout.iter().map(|&i| y_reg[i]).collect();
                *regression_metrics(&actual, &predicted)
                    .get("r2")
                    .unwrap_or(&0.0)
            }
            ProblemKind::Classification => {
                let actual: Vec<u32> = holdout.iter().map(|&i| y_cls[i]).collect();
                let predicted: Vec<u32> = predicted.into_iter().map(|p| p as u32).collect();
                *classification_metrics(&actual, &predicted)
                    .get("accuracy")
                    .unwrap_or(&0.0)
            }
        };
        scores.push(score);
    }
    Ok(Some(scores.iter().sum::<f64>() / scores.len() as f64))
}

/// Importance of each feature as the drop in training-set score after
/// shuffling that feature's column, floored at zero and sorted descending.
fn permutation_importance(
    estimator: &FittedEstimator,
    problem: ProblemKind,
    features: &[String],
    x: &[Vec<f64>],
    y_reg: &[f64],
    y_cls: &[u32],
    seed: u64,
) -> Result<Vec<(String, f64)>> {
    let baseline = score_rows(estimator, problem, x, y_reg, y_cls)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut importance = Vec::with_capacity(features.len());
    for (j, name) in features.iter().enumerate() {
        let mut shuffled: Vec<f64> = x.iter().map(|row| row[j]).collect();
        shuffled.shuffle(&mut rng);
        let permuted: Vec<Vec<f64>> = x
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut row = row.clone();
                row[j] = shuffled[i];
                row
            })
            .collect();
        let permuted_score = score_rows(estimator, problem, &permuted, y_reg, y_cls)?;
        importance.push((name.clone(), (baseline - permuted_score).max(0.0)));
    }

    importance.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(importance)
}

fn score_rows(
    estimator: &FittedEstimator,
    problem: ProblemKind,
    x: &[Vec<f64>],
    y_reg: &[f64],
    y_cls: &[u32],
) -> Result<f64> {
    let predicted = estimator.predict(&dense_matrix(x)?)?;
    Ok(match problem {
        ProblemKind::Regression => *regression_metrics(y_reg, &predicted)
            .get("r2")
            .unwrap_or(&0.0),
        ProblemKind::Classification => {
            let predicted: Vec<u32> = predicted.into_iter().map(|p| p as u32).collect();
            *classification_metrics(y_cls, &predicted)
                .get("accuracy")
                .unwrap_or(&0.0)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regression_frame() -> DataFrame {
        let x1: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..100).map(|i| ((i * 31) % 17) as f64).collect();
        let y: Vec<f64> = x1
            .iter()
            .zip(x2.iter())
            .map(|(a, b)| 3.0 * a + 0.5 * b + 1.0)
            .collect();
        df!["x1" => &x1, "x2" => &x2, "y" => &y].unwrap()
    }

    fn classification_frame() -> DataFrame {
        let x1: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
        let y: Vec<i64> = x1.iter().map(|v| i64::from(*v >= 5.0)).collect();
        let noise: Vec<f64> = (0..100).map(|i| ((i * 7) % 13) as f64).collect();
        df!["x1" => &x1, "noise" => &noise, "y" => &y].unwrap()
    }

    // ==================== problem detection ====================

    #[test]
    fn test_detect_classification_for_small_int_target() {
        let s = Series::new("y".into(), &[0i64, 1, 0, 1, 1]);
        assert_eq!(detect_problem(&s).unwrap(), ProblemKind::Classification);
    }

    #[test]
    fn test_detect_regression_for_float_target() {
        let s = Series::new("y".into(), &[0.5f64, 1.5, 2.5]);
        assert_eq!(detect_problem(&s).unwrap(), ProblemKind::Regression);
    }

    #[test]
    fn test_detect_regression_for_high_cardinality_int() {
        let values: Vec<i64> = (0..50).collect();
        let s = Series::new("y".into(), &values);
        assert_eq!(detect_problem(&s).unwrap(), ProblemKind::Regression);
    }

    // ==================== fitting and prediction ====================

    #[test]
    fn test_linear_regression_r2_nonnegative() {
        let df = regression_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Linear);
        trainer.fit(&df, "y", None).unwrap();
        let metrics = trainer.evaluate(&df, "y").unwrap();
        assert!(metrics["r2"] >= 0.0, "r2 = {}", metrics["r2"]);
        assert!(metrics["r2"] > 0.9);
    }

    #[test]
    fn test_forest_classification_accuracy() {
        let df = classification_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Tree).with_params(ModelParams {
            n_estimators: 20,
            max_depth: Some(5),
            seed: 42,
        });
        trainer.fit(&df, "y", None).unwrap();
        let metrics = trainer.evaluate(&df, "y").unwrap();
        assert!(metrics["accuracy"] > 0.9);
        assert!(metrics.contains_key("precision"));
        assert!(metrics.contains_key("recall"));
        assert!(metrics.contains_key("f1"));
    }

    #[test]
    fn test_predict_before_fit_raises() {
        let df = regression_frame();
        let trainer = ModelTrainer::new(ModelKind::Tree);
        let err = trainer.predict(&df).unwrap_err();
        assert_eq!(err.error_code(), "NOT_TRAINED");
    }

    #[test]
    fn test_missing_target_raises() {
        let df = regression_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Linear);
        let err = trainer.fit(&df, "absent", None).unwrap_err();
        assert_eq!(err.error_code(), "TARGET_NOT_FOUND");
    }

    #[test]
    fn test_schema_mismatch_on_predict() {
        let df = regression_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Linear);
        trainer.fit(&df, "y", None).unwrap();

        let incomplete = df.drop("x2").unwrap();
        let err = trainer.predict(&incomplete).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    }

    #[test]
    fn test_predict_on_empty_frame_raises() {
        let df = regression_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Linear);
        trainer.fit(&df, "y", None).unwrap();

        // Same schema, zero rows.
        let empty = df.slice(0, 0);
        let err = trainer.predict(&empty).unwrap_err();
        assert_eq!(err.error_code(), "PREDICTION_FAILED");
    }

    #[test]
    fn test_fit_on_empty_frame_raises() {
        let empty = regression_frame().slice(0, 0);
        let mut trainer = ModelTrainer::new(ModelKind::Linear);
        let err = trainer.fit(&empty, "y", None).unwrap_err();
        assert_eq!(err.error_code(), "TRAINING_FAILED");
    }

    #[test]
    fn test_gradient_boosted_not_installed() {
        let df = regression_frame();
        let mut trainer = ModelTrainer::new(ModelKind::GradientBoosted);
        let err = trainer.fit(&df, "y", None).unwrap_err();
        assert_eq!(err.error_code(), "BACKEND_UNAVAILABLE");
    }

    // ==================== feature importance ====================

    #[test]
    fn test_tree_importance_ranks_signal_first() {
        let df = classification_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Tree).with_params(ModelParams {
            n_estimators: 20,
            max_depth: Some(5),
            seed: 42,
        });
        trainer.fit(&df, "y", None).unwrap();
        let importance = trainer.feature_importance().unwrap();
        assert_eq!(importance.len(), 2);
        assert_eq!(importance[0].0, "x1");
        assert!(importance[0].1 >= importance[1].1);
    }

    #[test]
    fn test_linear_importance_empty() {
        let df = regression_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Linear);
        trainer.fit(&df, "y", None).unwrap();
        assert!(trainer.feature_importance().unwrap().is_empty());
    }

    #[test]
    fn test_importance_before_fit_raises() {
        let trainer = ModelTrainer::new(ModelKind::Tree);
        let err = trainer.feature_importance().unwrap_err();
        assert_eq!(err.error_code(), "NOT_TRAINED");
    }

    // ==================== labels ====================

    #[test]
    fn test_predict_labels_for_classifier() {
        let df = classification_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Tree).with_params(ModelParams {
            n_estimators: 20,
            max_depth: Some(5),
            seed: 42,
        });
        trainer.fit(&df, "y", None).unwrap();
        let labels = trainer.predict_labels(&df).unwrap();
        assert_eq!(labels.len(), 100);
        assert!(labels.iter().all(|l| l == "0" || l == "1"));
    }

    #[test]
    fn test_predict_labels_on_regressor_raises() {
        let df = regression_frame();
        let mut trainer = ModelTrainer::new(ModelKind::Linear);
        trainer.fit(&df, "y", None).unwrap();
        let err = trainer.predict_labels(&df).unwrap_err();
        assert_eq!(err.error_code(), "PREDICTION_FAILED");
    }
}
