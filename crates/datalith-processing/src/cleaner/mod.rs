//! Data cleaning and feature engineering.
//!
//! [`DataCleaner::process`] runs a fixed, ordered sequence of five
//! transformations: missing-value imputation, de-duplication, outlier
//! capping, categorical encoding, and feature synthesis. The target column,
//! when given, is exempt from capping and encoding but participates in
//! imputation and de-duplication like any other column.

mod encode;
mod features;
mod impute;
mod outliers;

pub use encode::encode_categoricals;
pub use features::synthesize_features;
pub use impute::impute_missing;
pub use outliers::cap_outliers;

use crate::error::{ProcessingError, Result};
use crate::types::LabelMap;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::info;

/// Runs the cleaning pipeline and holds fitted label mappings.
///
/// An instance is meant for a single caller; reusing it on a second dataset
/// with the same schema re-applies the fitted label mappings.
#[derive(Debug, Default)]
pub struct DataCleaner {
    label_maps: HashMap<String, LabelMap>,
}

impl DataCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean a dataset, returning the transformed frame.
    pub fn process(&mut self, df: &DataFrame, target: Option<&str>) -> Result<DataFrame> {
        let mut df = df.clone();
        let input_rows = df.height();

        impute_missing(&mut df)?;
        df = deduplicate(&df)?;
        cap_outliers(&mut df, target)?;
        encode_categoricals(&mut df, target, &mut self.label_maps)?;
        synthesize_features(&mut df, target)?;

        info!(
            input_rows,
            output_rows = df.height(),
            output_columns = df.width(),
            "cleaning pipeline finished"
        );
        Ok(df)
    }

    /// Fitted label mappings, keyed by source column name.
    pub fn label_maps(&self) -> &HashMap<String, LabelMap> {
        &self.label_maps
    }
}

/// Drop exact duplicate rows, keeping the first occurrence and preserving the
/// relative order of kept rows.
pub fn deduplicate(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}

/// Split rows into disjoint train and test frames.
///
/// Rows are shuffled with the given seed before splitting; the test frame
/// gets `floor(n * test_fraction)` rows and the train frame the rest.
pub fn train_test_split(
    df: &DataFrame,
    test_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    let n = df.height();
    if n < 2 {
        return Err(ProcessingError::InsufficientData {
            min_required: 2,
            actual: n,
        });
    }
    let mut indices: Vec<u32> = (0..n as u32).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = (n as f64 * test_fraction) as usize;
    let test_idx = IdxCa::from_vec("idx".into(), indices[..test_size].to_vec());
    let train_idx = IdxCa::from_vec("idx".into(), indices[test_size..].to_vec());

    let test = df.take(&test_idx)?;
    let train = df.take(&train_idx)?;
    Ok((train, test))
}
