//! Categorical encoding.
//!
//! Low-cardinality string columns expand into indicator columns (first
//! category dropped as the reference level); high-cardinality columns are
//! label-encoded in place with first-seen integer codes. Label mappings are
//! retained so a reused cleaner encodes the same category to the same code.

use crate::error::{ProcessingError, Result};
use crate::types::LabelMap;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Distinct-value count at or below which a column is one-hot expanded.
const ONE_HOT_MAX_CARDINALITY: usize = 10;

/// Encode every string column except the target.
///
/// `label_maps` carries fitted mappings across calls on the same cleaner;
/// encountering a category absent from an existing mapping is an error.
pub fn encode_categoricals(
    df: &mut DataFrame,
    target: Option<&str>,
    label_maps: &mut HashMap<String, LabelMap>,
) -> Result<()> {
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| col.dtype() == &DataType::String)
        .map(|col| col.name().to_string())
        .collect();

    for name in names {
        if target == Some(name.as_str()) {
            continue;
        }
        let series = df.column(name.as_str())?.as_materialized_series().clone();
        let distinct = series.n_unique()?;

        if distinct <= ONE_HOT_MAX_CARDINALITY {
            one_hot_expand(df, &name, &series)?;
        } else {
            label_encode(df, &name, &series, label_maps)?;
        }
    }
    Ok(())
}

/// Replace `name` with N-1 sorted indicator columns, dropping the first
/// category as the reference level.
fn one_hot_expand(df: &mut DataFrame, name: &str, series: &Series) -> Result<()> {
    let ca = series.str()?;
    let mut categories: Vec<String> = ca
        .into_iter()
        .flatten()
        .map(|v| v.to_string())
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .collect();
    categories.sort();

    debug!(column = %name, categories = categories.len(), "one-hot expanding");

    let existing: std::collections::HashSet<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();

    let mut indicators = Vec::new();
    for category in categories.iter().skip(1) {
        let indicator_name = format!("{name}_{category}");
        if existing.contains(&indicator_name) {
            return Err(ProcessingError::FeatureNameCollision {
                name: indicator_name,
            });
        }
        let values: Vec<i32> = ca
            .into_iter()
            .map(|v| i32::from(v == Some(category.as_str())))
            .collect();
        indicators.push(Series::new(indicator_name.as_str().into(), values));
    }

    df.drop_in_place(name)?;
    for indicator in indicators {
        df.with_column(indicator)?;
    }
    Ok(())
}

/// Replace `name` in place with first-seen integer codes, reusing a fitted
/// mapping when one exists.
fn label_encode(
    df: &mut DataFrame,
    name: &str,
    series: &Series,
    label_maps: &mut HashMap<String, LabelMap>,
) -> Result<()> {
    let ca = series.str()?;
    let fitted = label_maps.contains_key(name);
    let map = label_maps
        .entry(name.to_string())
        .or_insert_with(|| LabelMap::new(name));

    let mut codes = Vec::with_capacity(series.len());
    for value in ca.into_iter() {
        let value = value.unwrap_or("Unknown");
        let code = if fitted {
            map.lookup(value).ok_or_else(|| ProcessingError::UnseenCategory {
                column: name.to_string(),
                value: value.to_string(),
            })?
        } else {
            map.encode(value)
        };
        codes.push(code);
    }

    debug!(column = %name, categories = map.codes.len(), "label encoded");
    df.replace(name, Series::new(name.into(), codes))?;
    Ok(())
}
