//! Dataset loading.
//!
//! Readers are selected by file extension: CSV, newline-delimited JSON
//! (`.ndjson` / `.jsonl`), and Parquet. Loads can be run synchronously or
//! pushed onto a blocking thread from async contexts.

mod stream;

pub use stream::{BatchStream, StreamOptions};

use crate::error::{ProcessingError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SUPPORTED_EXTENSIONS: &str = "csv, ndjson, jsonl, parquet";

/// Loads tabular files into DataFrames.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a dataset, choosing the reader by file extension.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProcessingError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        debug!(path = %path.display(), %extension, "loading dataset");

        let df = match extension.as_str() {
            "csv" => read_csv(path),
            "ndjson" | "jsonl" => read_ndjson(path),
            "parquet" => read_parquet(path),
            _ => {
                return Err(ProcessingError::UnsupportedFormat {
                    path: path.display().to_string(),
                    extension,
                    supported: SUPPORTED_EXTENSIONS.to_string(),
                });
            }
        }
        .map_err(|e| ProcessingError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "dataset loaded"
        );
        Ok(df)
    }

    /// Load a dataset from an async context without blocking the runtime.
    pub async fn load_async(&self, path: impl Into<PathBuf>) -> Result<DataFrame> {
        let path = path.into();
        let loader = self.clone();
        tokio::task::spawn_blocking(move || loader.load(&path))
            .await
            .map_err(|e| ProcessingError::Internal(format!("load task panicked: {e}")))?
    }
}

fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

fn read_ndjson(path: &Path) -> PolarsResult<DataFrame> {
    JsonLineReader::from_path(path)?.finish()
}

fn read_parquet(path: &Path) -> PolarsResult<DataFrame> {
    let file = File::open(path)?;
    ParquetReader::new(file).finish()
}
