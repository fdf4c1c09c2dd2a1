//! Outlier models used by the detector

pub mod isolation_forest;

pub use isolation_forest::IsolationForest;

use std::fmt;

use crate::error::DetectorError;

/// Verdict for a single sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Normal,
    Anomaly,
}

impl Label {
    pub fn is_anomaly(self) -> bool {
        self == Label::Anomaly
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Normal => write!(f, "normal"),
            Label::Anomaly => write!(f, "anomaly"),
        }
    }
}

/// Trait for outlier models
pub trait AnomalyModel: Send {
    /// Train from scratch on the given samples, discarding any previous fit
    fn fit(&mut self, samples: &[Vec<f64>]) -> Result<(), DetectorError>;

    /// Score a sample (higher = more anomalous)
    fn score(&self, sample: &[f64]) -> Result<f64, DetectorError>;

    fn predict(&self, sample: &[f64]) -> Result<Label, DetectorError>;

    fn is_trained(&self) -> bool;

    fn name(&self) -> &str;
}
