//! Outlier capping.
//!
//! Values more than three standard deviations from the column mean are capped
//! to the three-sigma bound. Capping never removes rows.

use crate::error::Result;
use crate::utils::{is_numeric_dtype, mean_and_std, non_null_values};
use polars::prelude::*;
use tracing::debug;

const Z_CAP: f64 = 3.0;

/// Cap extreme values in every numeric column except the target.
pub fn cap_outliers(df: &mut DataFrame, target: Option<&str>) -> Result<()> {
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect();

    for name in names {
        if target == Some(name.as_str()) {
            continue;
        }
        let series = df.column(name.as_str())?.as_materialized_series().clone();
        let (mean, std) = mean_and_std(&non_null_values(&series)?);
        // Zero-variance columns have no outliers to cap.
        if std == 0.0 {
            continue;
        }

        let lower = mean - Z_CAP * std;
        let upper = mean + Z_CAP * std;
        let float_series = series.cast(&DataType::Float64)?;
        let mut capped = 0usize;
        let values: Vec<Option<f64>> = float_series
            .f64()?
            .into_iter()
            .map(|v| {
                v.map(|v| {
                    if v < lower {
                        capped += 1;
                        lower
                    } else if v > upper {
                        capped += 1;
                        upper
                    } else {
                        v
                    }
                })
            })
            .collect();

        if capped > 0 {
            debug!(column = %name, capped, %lower, %upper, "capped outliers");
            df.replace(name.as_str(), Series::new(name.as_str().into(), values))?;
        }
    }
    Ok(())
}
