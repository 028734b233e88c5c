//! Normality assessment via the Jarque-Bera test.
//!
//! The test statistic combines sample skewness and excess kurtosis and is
//! asymptotically chi-squared with two degrees of freedom, which gives the
//! closed-form p-value `exp(-JB / 2)`.

use crate::analysis::descriptive::moments;
use crate::types::DistributionSummary;
use crate::utils::mean_and_std;

/// Significance level for the normality decision.
pub const NORMALITY_ALPHA: f64 = 0.05;

/// Values beyond this count are ignored to bound the test's cost.
pub const NORMALITY_SAMPLE_CAP: usize = 5000;

/// Assess normality of a column's non-null values.
///
/// Columns with three or fewer values, or zero variance, are reported as
/// non-normal with a p-value of 0 rather than tested.
pub fn assess_normality(column: &str, values: &[f64]) -> DistributionSummary {
    let sample = &values[..values.len().min(NORMALITY_SAMPLE_CAP)];
    if sample.len() <= 3 {
        return DistributionSummary {
            column: column.to_string(),
            statistic: 0.0,
            p_value: 0.0,
            looks_normal: false,
        };
    }

    let (mean, std) = mean_and_std(sample);
    if std == 0.0 {
        return DistributionSummary {
            column: column.to_string(),
            statistic: 0.0,
            p_value: 0.0,
            looks_normal: false,
        };
    }

    let n = sample.len() as f64;
    let (skewness, kurtosis) = moments(sample, mean, std);
    let statistic = n / 6.0 * (skewness.powi(2) + kurtosis.powi(2) / 4.0);
    // Chi-squared with 2 degrees of freedom: survival function is exp(-x/2).
    let p_value = (-statistic / 2.0).exp();

    DistributionSummary {
        column: column.to_string(),
        statistic,
        p_value,
        looks_normal: p_value > NORMALITY_ALPHA,
    }
}
