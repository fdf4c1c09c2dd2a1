//! Append-only reading history with a suffix view

use crate::sensor::SensorReading;

/// Every reading of the session. Never trimmed; readers take a tail slice.
#[derive(Debug, Default)]
pub struct ReadingLog {
    entries: Vec<SensorReading>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, reading: SensorReading) {
        self.entries.push(reading);
    }

    /// Last `min(n, len)` readings in append order.
    pub fn tail(&self, n: usize) -> &[SensorReading] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn latest(&self) -> Option<&SensorReading> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
