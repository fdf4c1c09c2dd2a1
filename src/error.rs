//! Error types for the monitor

use thiserror::Error;

/// Model fitting / prediction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("Cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Non-finite feature value at sample {index}")]
    NonFinite { index: usize },

    #[error("Feature {feature} spans a range too wide to split")]
    RangeOverflow { feature: usize },

    #[error("Model has not been fitted")]
    NotFitted,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level errors for a monitor run
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] hdrhistogram::CreationError),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
