//! Model and problem kinds, and training hyperparameters.

use crate::error::LearningError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which family of estimator to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Random forest ensemble.
    Tree,
    /// Gradient-boosted ensemble; declared but requires an optional backend.
    GradientBoosted,
    /// Linear regression or logistic regression, per the problem kind.
    Linear,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::GradientBoosted => "gradient_boosted",
            Self::Linear => "linear",
        }
    }
}

impl FromStr for ModelKind {
    type Err = LearningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" | "random_forest" => Ok(Self::Tree),
            "gradient_boosted" | "gradient_boosting" => Ok(Self::GradientBoosted),
            "linear" => Ok(Self::Linear),
            other => Err(LearningError::UnknownModel(other.to_string())),
        }
    }
}

/// Regression vs. classification, resolved once at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    Regression,
    Classification,
}

impl ProblemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regression => "regression",
            Self::Classification => "classification",
        }
    }
}

/// Training hyperparameters shared across model kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelParams {
    pub n_estimators: usize,
    pub max_depth: Option<u32>,
    pub seed: u64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: Some(10),
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("tree".parse::<ModelKind>().unwrap(), ModelKind::Tree);
        assert_eq!(
            "gradient_boosted".parse::<ModelKind>().unwrap(),
            ModelKind::GradientBoosted
        );
        assert_eq!("linear".parse::<ModelKind>().unwrap(), ModelKind::Linear);
        assert!(matches!(
            "svm".parse::<ModelKind>(),
            Err(LearningError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_default_params() {
        let params = ModelParams::default();
        assert_eq!(params.n_estimators, 100);
        assert_eq!(params.max_depth, Some(10));
        assert_eq!(params.seed, 42);
    }
}
