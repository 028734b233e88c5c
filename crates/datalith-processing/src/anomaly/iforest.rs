//! Isolation forest.
//!
//! Anomalous points isolate in fewer random splits than regular points, so
//! the expected path length over an ensemble of random trees yields an
//! anomaly score. Scores follow the standard normalization against the
//! average path length of an unsuccessful binary search.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const DEFAULT_TREE_COUNT: usize = 100;
const MAX_TREE_SAMPLES: usize = 256;

enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Ensemble of randomized isolation trees with a contamination-derived
/// decision threshold.
pub struct IsolationForest {
    tree_count: usize,
    contamination: f64,
    seed: u64,
    trees: Vec<Node>,
    sample_size: usize,
    threshold: f64,
}

impl IsolationForest {
    /// `contamination` is the expected anomalous fraction of the training
    /// data and sets the decision threshold.
    pub fn new(tree_count: usize, contamination: f64, seed: u64) -> Self {
        Self {
            tree_count,
            contamination,
            seed,
            trees: Vec::new(),
            sample_size: 0,
            threshold: 0.5,
        }
    }

    pub fn with_defaults(seed: u64) -> Self {
        Self::new(DEFAULT_TREE_COUNT, 0.1, seed)
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Fit the ensemble on row-major data and derive the decision threshold
    /// from the contamination quantile of the training scores.
    pub fn fit(&mut self, data: &[Vec<f64>]) {
        let n = data.len();
        if n == 0 {
            return;
        }
        self.sample_size = n.min(MAX_TREE_SAMPLES);
        let height_limit = (self.sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.trees.clear();
        for _ in 0..self.tree_count {
            let mut sample: Vec<usize> = (0..n).collect();
            // Partial Fisher-Yates: the first sample_size entries are a
            // uniform sample without replacement.
            for i in 0..self.sample_size {
                let j = rng.gen_range(i..n);
                sample.swap(i, j);
            }
            sample.truncate(self.sample_size);
            let tree = build_tree(data, &sample, 0, height_limit, &mut rng);
            self.trees.push(tree);
        }

        let mut scores: Vec<f64> = data.iter().map(|row| self.score(row)).collect();
        scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let cutoff = ((n as f64 * self.contamination) as usize).min(n - 1);
        self.threshold = scores[cutoff];
        debug!(
            trees = self.trees.len(),
            sample_size = self.sample_size,
            threshold = self.threshold,
            "isolation forest fitted"
        );
    }

    /// Anomaly score in (0, 1); higher means more isolated.
    pub fn score(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|t| path_length(t, row, 0)).sum();
        let mean_path = total / self.trees.len() as f64;
        let c = average_path_length(self.sample_size);
        if c == 0.0 {
            return 0.0;
        }
        2f64.powf(-mean_path / c)
    }

    /// Binary anomaly decision against the fitted threshold.
    pub fn is_anomalous(&self, row: &[f64]) -> bool {
        self.score(row) > self.threshold
    }
}

fn build_tree(
    data: &[Vec<f64>],
    indices: &[usize],
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if indices.len() <= 1 || depth >= height_limit {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let n_features = data[indices[0]].len();
    if n_features == 0 {
        return Node::Leaf {
            size: indices.len(),
        };
    }
    let feature = rng.gen_range(0..n_features);
    let (min, max) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
        let v = data[i][feature];
        (lo.min(v), hi.max(v))
    });
    if min == max {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let value = rng.gen_range(min..max);
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.iter().partition(|&&i| data[i][feature] < value);

    Node::Split {
        feature,
        value,
        left: Box::new(build_tree(data, &left, depth + 1, height_limit, rng)),
        right: Box::new(build_tree(data, &right, depth + 1, height_limit, rng)),
    }
}

fn path_length(node: &Node, row: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            value,
            left,
            right,
        } => {
            if row[*feature] < *value {
                path_length(left, row, depth + 1)
            } else {
                path_length(right, row, depth + 1)
            }
        }
    }
}

/// Average path length of an unsuccessful search in a binary search tree of
/// `n` nodes; the c(n) normalizer from the isolation forest formulation.
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    let harmonic = (n - 1.0).ln() + 0.5772156649015329;
    2.0 * harmonic - 2.0 * (n - 1.0) / n
}
