//! Tabular data loading, cleaning, and statistical analysis built on Polars.
//!
//! The crate is organized as a forward pipeline:
//!
//! - [`loader`]: reads CSV, newline-delimited JSON, and Parquet files into
//!   DataFrames, synchronously or from async contexts, with optional batched
//!   streaming.
//! - [`cleaner`]: a fixed five-step cleaning pipeline (imputation,
//!   de-duplication, outlier capping, categorical encoding, feature
//!   synthesis) plus a seeded train/test split.
//! - [`analysis`]: descriptive statistics, Pearson correlations,
//!   normality checks, two-sample hypothesis tests, outlier counts, and
//!   mutual-information feature ranking.
//! - [`anomaly`]: isolation-forest, z-score, and IQR anomaly detection.
//!
//! Instances are single-caller by design; parallel analyses should use
//! independent instances.

pub mod analysis;
pub mod anomaly;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod types;
pub mod utils;

pub use analysis::StatisticalAnalyzer;
pub use anomaly::{AnomalyDetector, DetectionMethod};
pub use cleaner::{train_test_split, DataCleaner};
pub use config::AppConfig;
pub use error::{ProcessingError, Result, ResultExt};
pub use loader::{BatchStream, DatasetLoader, StreamOptions};
pub use types::{AnomalyReport, LabelMap, StatisticsBundle};

// Pipeline types cross thread boundaries in async loads.
static_assertions::assert_impl_all!(DataCleaner: Send);
static_assertions::assert_impl_all!(DatasetLoader: Send, Sync);
static_assertions::assert_impl_all!(ProcessingError: Send, Sync);
