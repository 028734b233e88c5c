//! Evaluation metrics.
//!
//! Regression: mean squared error, root mean squared error, mean absolute
//! error, R². Classification: accuracy plus weighted precision, recall, and
//! F1 where an undefined ratio (zero division) counts as 0.

use std::collections::HashMap;

/// Regression metrics keyed by name: mse, rmse, mae, r2.
pub fn regression_metrics(actual: &[f64], predicted: &[f64]) -> HashMap<String, f64> {
    let n = actual.len() as f64;
    let mut metrics = HashMap::new();
    if actual.is_empty() || actual.len() != predicted.len() {
        return metrics;
    }

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;
    let mae = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot = actual.iter().map(|a| (a - mean).powi(2)).sum::<f64>();
    let ss_res = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>();
    // A zero-variance target makes R² undefined; a perfect fit reports 1.
    let r2 = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    metrics.insert("mse".to_string(), mse);
    metrics.insert("rmse".to_string(), mse.sqrt());
    metrics.insert("mae".to_string(), mae);
    metrics.insert("r2".to_string(), r2);
    metrics
}

/// Classification metrics keyed by name: accuracy, precision, recall, f1
/// (precision/recall/f1 are class-support weighted).
pub fn classification_metrics(actual: &[u32], predicted: &[u32]) -> HashMap<String, f64> {
    let n = actual.len() as f64;
    let mut metrics = HashMap::new();
    if actual.is_empty() || actual.len() != predicted.len() {
        return metrics;
    }

    let correct = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a == p)
        .count();
    metrics.insert("accuracy".to_string(), correct as f64 / n);

    let mut classes: Vec<u32> = actual.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;
    let mut f1_sum = 0.0;
    for &class in &classes {
        let tp = actual
            .iter()
            .zip(predicted.iter())
            .filter(|(a, p)| **a == class && **p == class)
            .count() as f64;
        let predicted_positive = predicted.iter().filter(|&&p| p == class).count() as f64;
        let actual_positive = actual.iter().filter(|&&a| a == class).count() as f64;

        let precision = if predicted_positive == 0.0 { 0.0 } else { tp / predicted_positive };
        let recall = if actual_positive == 0.0 { 0.0 } else { tp / actual_positive };
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        let weight = actual_positive / n;
        precision_sum += precision * weight;
        recall_sum += recall * weight;
        f1_sum += f1 * weight;
    }

    metrics.insert("precision".to_string(), precision_sum);
    metrics.insert("recall".to_string(), recall_sum);
    metrics.insert("f1".to_string(), f1_sum);
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_perfect_regression() {
        let actual = [1.0, 2.0, 3.0];
        let metrics = regression_metrics(&actual, &actual);
        assert_eq!(metrics["mse"], 0.0);
        assert_eq!(metrics["rmse"], 0.0);
        assert_eq!(metrics["mae"], 0.0);
        assert_eq!(metrics["r2"], 1.0);
    }

    #[test]
    fn test_mean_predictor_has_zero_r2() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [2.5, 2.5, 2.5, 2.5];
        let metrics = regression_metrics(&actual, &predicted);
        assert!(metrics["r2"].abs() < 1e-12);
    }

    #[test]
    fn test_rmse_is_sqrt_of_mse() {
        let actual = [0.0, 0.0];
        let predicted = [3.0, 4.0];
        let metrics = regression_metrics(&actual, &predicted);
        assert!((metrics["rmse"] - metrics["mse"].sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_classification() {
        let actual = [0u32, 1, 1, 0];
        let metrics = classification_metrics(&actual, &actual);
        assert_eq!(metrics["accuracy"], 1.0);
        assert_eq!(metrics["precision"], 1.0);
        assert_eq!(metrics["recall"], 1.0);
        assert_eq!(metrics["f1"], 1.0);
    }

    #[test]
    fn test_never_predicted_class_counts_zero() {
        // Class 1 is never predicted: its precision is 0, not an error.
        let actual = [0u32, 1, 1, 1];
        let predicted = [0u32, 0, 0, 0];
        let metrics = classification_metrics(&actual, &predicted);
        assert_eq!(metrics["accuracy"], 0.25);
        // Weighted precision: class 0 precision 0.25 * weight 0.25.
        assert!((metrics["precision"] - 0.0625).abs() < 1e-12);
        assert!(metrics["f1"] >= 0.0);
    }

    #[test]
    fn test_weighted_recall() {
        let actual = [0u32, 0, 0, 1];
        let predicted = [0u32, 0, 1, 1];
        let metrics = classification_metrics(&actual, &predicted);
        // Recall: class 0 = 2/3 (weight 0.75), class 1 = 1 (weight 0.25).
        let expected = (2.0 / 3.0) * 0.75 + 1.0 * 0.25;
        assert!((metrics["recall"] - expected).abs() < 1e-12);
    }
}
