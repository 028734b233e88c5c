//! Two-sample hypothesis testing.
//!
//! Compares two groups with either an independent two-sample t-test (pooled
//! variance) or a Mann-Whitney U rank test. P-values come from the normal
//! approximation of the test statistic's distribution, adequate for the
//! group sizes the toolkit works with.

use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Which two-sample test to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypothesisTest {
    TTest,
    MannWhitney,
}

impl FromStr for HypothesisTest {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ttest" => Ok(Self::TTest),
            "mannwhitney" => Ok(Self::MannWhitney),
            other => Err(ProcessingError::InvalidConfig(format!(
                "unknown test type '{other}' (expected ttest or mannwhitney)"
            ))),
        }
    }
}

/// Result of a two-sample test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
    /// True when the null hypothesis is rejected at alpha = 0.05.
    pub significant: bool,
}

/// Run a two-sample test between two groups of observations.
///
/// Each group needs at least two values.
pub fn hypothesis_test(
    group1: &[f64],
    group2: &[f64],
    test: HypothesisTest,
) -> Result<TestOutcome> {
    let smallest = group1.len().min(group2.len());
    if smallest < 2 {
        return Err(ProcessingError::InsufficientData {
            min_required: 2,
            actual: smallest,
        });
    }

    let (statistic, p_value) = match test {
        HypothesisTest::TTest => t_test(group1, group2),
        HypothesisTest::MannWhitney => mann_whitney(group1, group2),
    };

    Ok(TestOutcome {
        statistic,
        p_value,
        significant: p_value < SIGNIFICANCE_ALPHA,
    })
}

/// Independent two-sample t-test with pooled variance; two-sided p-value.
fn t_test(a: &[f64], b: &[f64]) -> (f64, f64) {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean1 = a.iter().sum::<f64>() / n1;
    let mean2 = b.iter().sum::<f64>() / n2;
    let var1 = a.iter().map(|v| (v - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
    let var2 = b.iter().map(|v| (v - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);

    let pooled = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
    let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    if se == 0.0 {
        return (0.0, 1.0);
    }
    let t = (mean1 - mean2) / se;
    (t, two_sided_p(t))
}

/// Mann-Whitney U (statistic for the first group); two-sided p-value via the
/// normal approximation with continuity correction. Tie correction to the
/// variance is omitted.
fn mann_whitney(a: &[f64], b: &[f64]) -> (f64, f64) {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;

    let mut all: Vec<(f64, usize)> = a
        .iter()
        .map(|&v| (v, 0))
        .chain(b.iter().map(|&v| (v, 1)))
        .collect();
    all.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));

    // Average ranks across ties.
    let mut ranks = vec![0.0; all.len()];
    let mut i = 0;
    while i < all.len() {
        let mut j = i;
        while j + 1 < all.len() && all[j + 1].0 == all[i].0 {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for r in ranks.iter_mut().take(j + 1).skip(i) {
            *r = rank;
        }
        i = j + 1;
    }

    let r1: f64 = all
        .iter()
        .zip(ranks.iter())
        .filter(|((_, group), _)| *group == 0)
        .map(|(_, &rank)| rank)
        .sum();
    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;

    let mu = n1 * n2 / 2.0;
    let sigma = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    if sigma == 0.0 {
        return (u1, 1.0);
    }
    let z = (u1 - mu - 0.5 * (u1 - mu).signum()) / sigma;
    (u1, two_sided_p(z))
}

/// Two-sided p-value of a standard-normal statistic.
fn two_sided_p(z: f64) -> f64 {
    (2.0 * normal_sf(z.abs())).min(1.0)
}

/// Standard-normal survival function via the Abramowitz-Stegun erf
/// approximation (max absolute error ~1.5e-7).
fn normal_sf(z: f64) -> f64 {
    let x = z / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    let erf = 1.0 - poly * (-x * x).exp();
    0.5 * (1.0 - erf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shifted_groups() -> (Vec<f64>, Vec<f64>) {
        let a: Vec<f64> = (0..30).map(|i| (i % 5) as f64).collect();
        let b: Vec<f64> = (0..30).map(|i| (i % 5) as f64 + 10.0).collect();
        (a, b)
    }

    #[test]
    fn test_ttest_separated_groups_significant() {
        let (a, b) = shifted_groups();
        let outcome = hypothesis_test(&a, &b, HypothesisTest::TTest).unwrap();
        assert!(outcome.significant, "p = {}", outcome.p_value);
        assert!(outcome.statistic < 0.0);
    }

    #[test]
    fn test_ttest_identical_groups_not_significant() {
        let a: Vec<f64> = (0..20).map(|i| (i % 7) as f64).collect();
        let outcome = hypothesis_test(&a, &a, HypothesisTest::TTest).unwrap();
        assert!(!outcome.significant);
        assert!(outcome.statistic.abs() < 1e-12);
        assert!(outcome.p_value > 0.99);
    }

    #[test]
    fn test_mannwhitney_separated_groups_significant() {
        let (a, b) = shifted_groups();
        let outcome = hypothesis_test(&a, &b, HypothesisTest::MannWhitney).unwrap();
        assert!(outcome.significant, "p = {}", outcome.p_value);
        // Every value of b outranks every value of a, so U1 is 0.
        assert_eq!(outcome.statistic, 0.0);
    }

    #[test]
    fn test_mannwhitney_identical_groups_not_significant() {
        let a: Vec<f64> = (0..20).map(|i| (i % 7) as f64).collect();
        let outcome = hypothesis_test(&a, &a, HypothesisTest::MannWhitney).unwrap();
        assert!(!outcome.significant);
    }

    #[test]
    fn test_unknown_test_type_rejected() {
        let err = "anova".parse::<HypothesisTest>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_tiny_group_rejected() {
        let err = hypothesis_test(&[1.0], &[1.0, 2.0], HypothesisTest::TTest).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
    }

    #[test]
    fn test_normal_sf_reference_values() {
        assert!((normal_sf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_sf(1.959964) - 0.025).abs() < 1e-4);
    }
}
