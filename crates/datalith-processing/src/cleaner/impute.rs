//! Missing-value imputation.
//!
//! Numeric columns take the column median; categorical columns take the mode,
//! falling back to "Unknown" when no mode exists.

use crate::error::Result;
use crate::utils::{is_numeric_dtype, is_temporal_dtype, string_mode};
use polars::prelude::*;
use tracing::debug;

const FALLBACK_CATEGORY: &str = "Unknown";

/// Fill missing values in every column that has at least one null.
pub fn impute_missing(df: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();

    for name in names {
        let series = df.column(name.as_str())?.as_materialized_series().clone();
        if series.null_count() == 0 {
            continue;
        }

        let filled = if is_numeric_dtype(series.dtype()) {
            // Median over non-null values; an all-null column stays as-is.
            match series.median() {
                Some(median) => {
                    debug!(column = %name, %median, "imputing numeric column with median");
                    let float_series = series.cast(&DataType::Float64)?;
                    let values: Vec<f64> = float_series
                        .f64()?
                        .into_iter()
                        .map(|v| v.unwrap_or(median))
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
                None => continue,
            }
        } else if is_temporal_dtype(series.dtype()) {
            // Forward fill, then backward fill for leading nulls.
            debug!(column = %name, "filling temporal column");
            series
                .fill_null(FillNullStrategy::Forward(None))?
                .fill_null(FillNullStrategy::Backward(None))?
        } else if series.dtype() == &DataType::String {
            let fill = string_mode(&series).unwrap_or_else(|| FALLBACK_CATEGORY.to_string());
            debug!(column = %name, %fill, "imputing categorical column");
            let values: Vec<String> = series
                .str()?
                .into_iter()
                .map(|v| v.unwrap_or(fill.as_str()).to_string())
                .collect();
            Series::new(name.as_str().into(), values)
        } else {
            continue;
        };

        df.replace(name.as_str(), filled)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_median_impute() {
        let mut df = df![
            "v" => [Some(1.0), None, Some(3.0), Some(100.0)],
        ]
        .unwrap();
        impute_missing(&mut df).unwrap();
        let values: Vec<f64> = df.column("v").unwrap().f64().unwrap().into_no_null_iter().collect();
        // Median of [1, 3, 100] is 3.
        assert_eq!(values, vec![1.0, 3.0, 3.0, 100.0]);
    }

    #[test]
    fn test_categorical_mode_impute() {
        let mut df = df![
            "cat" => [Some("a"), Some("a"), None, Some("b")],
        ]
        .unwrap();
        impute_missing(&mut df).unwrap();
        let values: Vec<&str> = df.column("cat").unwrap().str().unwrap().into_no_null_iter().collect();
        assert_eq!(values, vec!["a", "a", "a", "b"]);
    }

    #[test]
    fn test_all_null_string_gets_unknown() {
        let mut df = df![
            "cat" => [None::<&str>, None, None],
        ]
        .unwrap();
        impute_missing(&mut df).unwrap();
        let values: Vec<&str> = df.column("cat").unwrap().str().unwrap().into_no_null_iter().collect();
        assert_eq!(values, vec!["Unknown", "Unknown", "Unknown"]);
    }

    #[test]
    fn test_no_nulls_untouched() {
        let mut df = df!["v" => [1i64, 2, 3]].unwrap();
        impute_missing(&mut df).unwrap();
        // Column without nulls keeps its dtype.
        assert_eq!(df.column("v").unwrap().dtype(), &DataType::Int64);
    }
}
