//! Model artifact persistence.
//!
//! Artifacts serialize as a single JSON blob keyed by file path: the fitted
//! estimator plus its captured metadata restore together, so a loaded model
//! predicts with exactly the feature set it was trained on.

use crate::error::{LearningError, Result};
use crate::model::ModelArtifact;
use std::path::Path;
use tracing::info;

/// Write a fitted artifact to disk.
pub fn save_artifact(artifact: &ModelArtifact, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let blob = serde_json::to_vec(artifact).map_err(|e| LearningError::Persistence {
        path: path.display().to_string(),
        reason: format!("serialization failed: {e}"),
    })?;
    std::fs::write(path, blob).map_err(|e| LearningError::Persistence {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), "model artifact saved");
    Ok(())
}

/// Restore an artifact from disk.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let blob = std::fs::read(path).map_err(|e| LearningError::Persistence {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let artifact = serde_json::from_slice(&blob).map_err(|e| LearningError::Persistence {
        path: path.display().to_string(),
        reason: format!("deserialization failed: {e}"),
    })?;
    info!(path = %path.display(), "model artifact loaded");
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelTrainer;
    use crate::types::{ModelKind, ModelParams};
    use polars::prelude::*;

    #[test]
    fn test_save_load_round_trip_predictions_match() {
        let x: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let df = df!["x" => &x, "y" => &y].unwrap();

        let mut trainer = ModelTrainer::new(ModelKind::Tree).with_params(ModelParams {
            n_estimators: 10,
            max_depth: Some(5),
            seed: 1,
        });
        trainer.fit(&df, "y", None).unwrap();
        let before = trainer.predict(&df).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_artifact(trainer.artifact().unwrap(), &path).unwrap();

        let restored = ModelTrainer::new(ModelKind::Tree).with_artifact(load_artifact(&path).unwrap());
        let after = restored.predict(&df).unwrap();
        assert_eq!(before.len(), after.len());
        // JSON round-trips floats through decimal text, so the restored
        // forest's predictions can drift in the last ulps.
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((b - a).abs() < 1e-9, "prediction drifted: {b} vs {a}");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_artifact("/nonexistent/model.json").unwrap_err();
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn test_load_corrupt_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"not a model").unwrap();
        let err = load_artifact(&path).unwrap_err();
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
    }
}
