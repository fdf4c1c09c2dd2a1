//! Window-trained anomaly detector.
//!
//! Stays `Untrained` until the window holds more than `min_samples` readings, then
//! refits the model from scratch on every call to [`AnomalyDetector::observe`].

use super::generator::SensorReading;
use crate::config::MonitorConfig;
use crate::error::DetectorError;
use crate::model::{AnomalyModel, IsolationForest, Label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Untrained,
    Trained,
}

pub struct AnomalyDetector {
    model: Box<dyn AnomalyModel>,
    min_samples: usize,
    state: DetectorState,
    fit_count: u64,
}

impl AnomalyDetector {
    pub fn new(model: Box<dyn AnomalyModel>, min_samples: usize) -> Self {
        Self {
            model,
            min_samples,
            state: DetectorState::Untrained,
            fit_count: 0,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            Box::new(IsolationForest::from_config(&config.detector)),
            config.min_training_samples,
        )
    }

    /// Refit on `window` and classify its newest reading, once the window is large enough.
    pub fn observe(&mut self, window: &[SensorReading]) -> Result<Option<Label>, DetectorError> {
        if window.len() <= self.min_samples {
            return Ok(None);
        }
        let latest = match window.last() {
            Some(r) => r,
            None => return Ok(None),
        };

        self.fit(window)?;
        self.classify(latest).map(Some)
    }

    pub fn fit(&mut self, samples: &[SensorReading]) -> Result<(), DetectorError> {
        let features: Vec<Vec<f64>> = samples.iter().map(|r| r.features().to_vec()).collect();
        self.model.fit(&features)?;
        if self.state == DetectorState::Untrained {
            log::info!(
                "{} trained on {} readings",
                self.model.name(),
                samples.len()
            );
        }
        self.state = DetectorState::Trained;
        self.fit_count += 1;
        Ok(())
    }

    pub fn classify(&self, reading: &SensorReading) -> Result<Label, DetectorError> {
        self.model.predict(&reading.features())
    }

    pub fn score(&self, reading: &SensorReading) -> Result<f64, DetectorError> {
        self.model.score(&reading.features())
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn is_trained(&self) -> bool {
        self.state == DetectorState::Trained
    }

    pub fn fit_count(&self) -> u64 {
        self.fit_count
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }
}
