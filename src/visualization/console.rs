use super::{Frame, Presenter};
use crate::error::Result;
use crate::model::Label;

/// Logs the newest reading and verdict each tick.
#[derive(Debug, Default)]
pub struct ConsoleReport {
    last_label: Option<Label>,
}

impl ConsoleReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for ConsoleReport {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let Some(r) = frame.latest() else {
            return Ok(());
        };
        let line = format!(
            "[TICK {}] #{} temp={:.2}C vib={:.2}mm/s current={:.2}A power={:.2}kW",
            frame.tick,
            r.sequence_id,
            r.temperature_c,
            r.vibration_mm_s,
            r.current_a,
            r.power_kw
        );

        match frame.label {
            Some(Label::Anomaly) => {
                log::warn!("{line} -> anomaly detected, possible failure risk");
            }
            Some(Label::Normal) => {
                if self.last_label == Some(Label::Anomaly) {
                    log::info!("{line} -> back to normal");
                } else {
                    log::debug!("{line} -> normal");
                }
            }
            None => log::debug!(
                "{line} -> warming up ({}/{})",
                frame.window.len(),
                frame.min_training_samples + 1
            ),
        }
        self.last_label = frame.label;
        Ok(())
    }
}
