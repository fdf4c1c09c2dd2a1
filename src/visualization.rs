//! Visualization module - Output sinks for each tick

pub mod console;
pub mod dashboard;

pub use console::ConsoleReport;
pub use dashboard::HtmlDashboard;

use crate::error::Result;
use crate::metrics::MetricsReport;
use crate::model::Label;
use crate::sensor::{DetectorState, SensorReading};

/// Everything a presenter needs to draw one tick
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub tick: u64,
    pub window: &'a [SensorReading],
    pub label: Option<Label>,
    pub detector_state: DetectorState,
    pub min_training_samples: usize,
    pub metrics: &'a MetricsReport,
}

impl Frame<'_> {
    pub fn latest(&self) -> Option<&SensorReading> {
        self.window.last()
    }
}

pub trait Presenter {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}
