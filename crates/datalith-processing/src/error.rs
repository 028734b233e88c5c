//! Custom error types for the analytics toolkit.
//!
//! Errors are narrow by kind so callers can branch on cause: load failures,
//! validation failures, and configuration errors are distinct variants rather
//! than a single catch-all.

use thiserror::Error;

/// The main error type for data processing operations.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Input file does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Input file has an extension no reader handles.
    #[error("Unsupported file format '{extension}' for {path} (supported: {supported})")]
    UnsupportedFormat {
        path: String,
        extension: String,
        supported: String,
    },

    /// Input file exists but could not be parsed.
    #[error("Failed to load {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided (unknown method name, bad threshold, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A retained label mapping was asked to encode a category it never saw.
    #[error("Unseen category '{value}' in column '{column}' for a fitted label mapping")]
    UnseenCategory { column: String, value: String },

    /// A synthesized or indicator column would shadow an existing column.
    #[error("Generated feature '{name}' collides with existing column")]
    FeatureNameCollision { name: String },

    /// Continuous anomaly scores requested from a threshold-based detector.
    #[error("Anomaly scores are only available for the isolation forest method, not {method}")]
    ScoresUnavailable { method: String },

    /// Not enough rows/values to run the requested computation.
    #[error("Insufficient data: need at least {min_required} values, got {actual}")]
    InsufficientData { min_required: usize, actual: usize },

    /// Internal error (e.g., thread join failure).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable code for programmatic handling and log filtering.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FILE_NOT_FOUND",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::Malformed { .. } => "MALFORMED_INPUT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnseenCategory { .. } => "UNSEEN_CATEGORY",
            Self::FeatureNameCollision { .. } => "FEATURE_NAME_COLLISION",
            Self::ScoresUnavailable { .. } => "SCORES_UNAVAILABLE",
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a usage/configuration error (as opposed to bad data).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::UnsupportedFormat { .. } | Self::ScoresUnavailable { .. }
        )
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}
