//! Isolation forest (Liu, Ting & Zhou, 2008).
//!
//! Each tree isolates a random sub-sample with random axis-aligned splits. Outliers are
//! separated closer to the root, so a short average path length means a high score:
//! `s(x) = 2^(-E[h(x)] / c(psi))`. The decision threshold is the `1 - contamination`
//! quantile of the training scores.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use super::{AnomalyModel, Label};
use crate::config::DetectorConfig;
use crate::error::DetectorError;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

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

struct Fitted {
    trees: Vec<Node>,
    dims: usize,
    norm: f64,
    threshold: f64,
}

pub struct IsolationForest {
    n_trees: usize,
    max_samples: usize,
    contamination: f64,
    seed: u64,
    fitted: Option<Fitted>,
}

impl IsolationForest {
    pub fn new(n_trees: usize, max_samples: usize, contamination: f64, seed: u64) -> Self {
        Self {
            n_trees: n_trees.max(1),
            max_samples: max_samples.max(2),
            contamination,
            seed,
            fitted: None,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.n_trees, config.max_samples, config.contamination, config.seed)
    }

    /// Score above which a sample is an anomaly, once fitted.
    pub fn threshold(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.threshold)
    }

    fn check_samples(samples: &[Vec<f64>]) -> Result<usize, DetectorError> {
        let dims = samples.first().ok_or(DetectorError::EmptyTrainingSet)?.len();
        for (i, s) in samples.iter().enumerate() {
            if s.len() != dims {
                return Err(DetectorError::DimensionMismatch {
                    expected: dims,
                    actual: s.len(),
                });
            }
            if s.iter().any(|v| !v.is_finite()) {
                return Err(DetectorError::NonFinite { index: i });
            }
        }
        // Split values are drawn from [min, max); the span itself must be finite
        for feature in 0..dims {
            let (lo, hi) = samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s[feature]), hi.max(s[feature]))
            });
            if !(hi - lo).is_finite() {
                return Err(DetectorError::RangeOverflow { feature });
            }
        }
        Ok(dims)
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl AnomalyModel for IsolationForest {
    fn fit(&mut self, samples: &[Vec<f64>]) -> Result<(), DetectorError> {
        self.fitted = None;
        let dims = Self::check_samples(samples)?;

        let psi = self.max_samples.min(samples.len());
        let height_limit = (psi as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let trees = (0..self.n_trees)
            .map(|_| {
                let subset = index::sample(&mut rng, samples.len(), psi).into_vec();
                build_tree(samples, subset, 0, height_limit, dims, &mut rng)
            })
            .collect();

        let mut fitted = Fitted {
            trees,
            dims,
            norm: average_path_length(psi).max(1.0),
            threshold: 0.0,
        };
        let mut scores: Vec<f64> = samples.iter().map(|s| fitted.score(s)).collect();
        fitted.threshold = quantile(&mut scores, 1.0 - self.contamination);
        self.fitted = Some(fitted);
        Ok(())
    }

    fn score(&self, sample: &[f64]) -> Result<f64, DetectorError> {
        let fitted = self.fitted.as_ref().ok_or(DetectorError::NotFitted)?;
        if sample.len() != fitted.dims {
            return Err(DetectorError::DimensionMismatch {
                expected: fitted.dims,
                actual: sample.len(),
            });
        }
        if sample.iter().any(|v| !v.is_finite()) {
            return Err(DetectorError::NonFinite { index: 0 });
        }
        Ok(fitted.score(sample))
    }

    fn predict(&self, sample: &[f64]) -> Result<Label, DetectorError> {
        let score = self.score(sample)?;
        let threshold = self.threshold().ok_or(DetectorError::NotFitted)?;
        Ok(if score > threshold { Label::Anomaly } else { Label::Normal })
    }

    fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    fn name(&self) -> &str {
        "IsolationForest"
    }
}

impl Fitted {
    fn score(&self, sample: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| path_length(t, sample, 0)).sum();
        let mean = total / self.trees.len() as f64;
        2f64.powf(-mean / self.norm)
    }
}

fn build_tree(
    samples: &[Vec<f64>],
    subset: Vec<usize>,
    depth: usize,
    height_limit: usize,
    dims: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= height_limit || subset.len() <= 1 {
        return Node::Leaf { size: subset.len() };
    }

    // Only features that still vary inside this node can split it
    let candidates: Vec<(usize, f64, f64)> = (0..dims)
        .filter_map(|f| {
            let (lo, hi) = subset.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                (lo.min(samples[i][f]), hi.max(samples[i][f]))
            });
            (hi > lo).then_some((f, lo, hi))
        })
        .collect();
    if candidates.is_empty() {
        return Node::Leaf { size: subset.len() };
    }

    let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
    let value = rng.gen_range(lo..hi);
    let (left, right): (Vec<usize>, Vec<usize>) =
        subset.into_iter().partition(|&i| samples[i][feature] < value);

    Node::Split {
        feature,
        value,
        left: Box::new(build_tree(samples, left, depth + 1, height_limit, dims, rng)),
        right: Box::new(build_tree(samples, right, depth + 1, height_limit, dims, rng)),
    }
}

fn path_length(node: &Node, sample: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split { feature, value, left, right } => {
            let next = if sample[*feature] < *value { left } else { right };
            path_length(next, sample, depth + 1)
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points, `c(n)`.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile; sorts `values` in place.
fn quantile(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
}
