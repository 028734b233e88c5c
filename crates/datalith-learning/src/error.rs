//! Error types for model training and evaluation.

use thiserror::Error;

/// The main error type for training, prediction, and persistence.
#[derive(Error, Debug)]
pub enum LearningError {
    /// Target column missing from the training frame.
    #[error("Target column '{0}' not found in dataset")]
    TargetNotFound(String),

    /// Model kind string did not match a known variant.
    #[error("Unknown model kind '{0}' (expected tree, gradient_boosted, or linear)")]
    UnknownModel(String),

    /// A declared model kind whose backing implementation is not compiled in.
    #[error("Model kind '{kind}' is not installed: {reason}")]
    BackendUnavailable { kind: String, reason: String },

    /// Predict/evaluate/importance called before fit.
    #[error("Model has not been trained; call fit first")]
    NotTrained,

    /// Predict-time columns do not match the feature set frozen at fit time.
    #[error("Schema mismatch: missing feature column '{0}'")]
    SchemaMismatch(String),

    /// The underlying estimator failed to fit.
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// The underlying estimator failed to predict.
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// Saving or loading a model artifact failed.
    #[error("Persistence error for {path}: {reason}")]
    Persistence { path: String, reason: String },

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LearningError {
    /// Stable code for programmatic handling and log filtering.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TargetNotFound(_) => "TARGET_NOT_FOUND",
            Self::UnknownModel(_) => "UNKNOWN_MODEL",
            Self::BackendUnavailable { .. } => "BACKEND_UNAVAILABLE",
            Self::NotTrained => "NOT_TRAINED",
            Self::SchemaMismatch(_) => "SCHEMA_MISMATCH",
            Self::TrainingFailed(_) => "TRAINING_FAILED",
            Self::PredictionFailed(_) => "PREDICTION_FAILED",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LearningError::NotTrained.error_code(), "NOT_TRAINED");
        assert_eq!(
            LearningError::UnknownModel("svm".to_string()).error_code(),
            "UNKNOWN_MODEL"
        );
    }

    #[test]
    fn test_backend_unavailable_message() {
        let err = LearningError::BackendUnavailable {
            kind: "gradient_boosted".to_string(),
            reason: "no gradient boosting backend is compiled in".to_string(),
        };
        assert!(err.to_string().contains("not installed"));
    }
}
