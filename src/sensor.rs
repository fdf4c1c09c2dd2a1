//! Sensor module - Synthetic data generation and anomaly detection

pub mod anomaly;
pub mod generator;

pub use anomaly::{AnomalyDetector, DetectorState};
pub use generator::{SensorGenerator, SensorReading, FEATURE_COUNT};
