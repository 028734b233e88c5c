//! Model training and evaluation for tabular analytics.
//!
//! [`ModelTrainer`] fits tree-ensemble or linear estimators to a Polars
//! DataFrame, auto-detecting regression vs. classification from the target
//! column, and evaluates with the standard metric set. Fitted artifacts
//! carry their frozen feature list and persist as JSON blobs.

pub mod error;
pub mod metrics;
pub mod model;
pub mod persist;
pub mod types;

pub use error::{LearningError, Result};
pub use model::{gradient_boosting_available, FittedEstimator, ModelArtifact, ModelTrainer};
pub use persist::{load_artifact, save_artifact};
pub use types::{ModelKind, ModelParams, ProblemKind};

static_assertions::assert_impl_all!(LearningError: Send, Sync);
static_assertions::assert_impl_all!(ModelKind: Send, Sync, Copy);
