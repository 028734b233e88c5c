//! Batched streaming over a loaded dataset.
//!
//! The stream loads the file eagerly, then yields fixed-size row slices with
//! an optional pause between batches so downstream consumers can keep up.

use crate::error::Result;
use crate::loader::DatasetLoader;
use polars::prelude::*;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Batch size and pacing for a [`BatchStream`].
#[derive(Debug, Clone)]
pub struct StreamOptions {
    pub batch_size: usize,
    /// Pause between batches; zero means no pacing.
    pub delay: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            delay: Duration::from_millis(10),
        }
    }
}

/// Yields a dataset in row batches.
pub struct BatchStream {
    df: DataFrame,
    options: StreamOptions,
    offset: usize,
}

impl BatchStream {
    /// Open a file and prepare to stream it in batches.
    pub fn open(path: impl AsRef<Path>, options: StreamOptions) -> Result<Self> {
        let df = DatasetLoader::new().load(path)?;
        Ok(Self {
            df,
            options,
            offset: 0,
        })
    }

    /// Stream over an already-loaded frame.
    pub fn from_frame(df: DataFrame, options: StreamOptions) -> Self {
        Self {
            df,
            options,
            offset: 0,
        }
    }

    /// Total number of batches this stream will yield.
    pub fn batch_count(&self) -> usize {
        self.df.height().div_ceil(self.options.batch_size)
    }

    /// Next batch of rows, or None when exhausted.
    ///
    /// Applies the configured delay before yielding, except for the first
    /// batch.
    pub async fn next_batch(&mut self) -> Option<DataFrame> {
        if self.offset >= self.df.height() {
            return None;
        }
        if self.offset > 0 && !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }
        let batch = self
            .df
            .slice(self.offset as i64, self.options.batch_size);
        debug!(offset = self.offset, rows = batch.height(), "yielding batch");
        self.offset += self.options.batch_size;
        Some(batch)
    }
}
