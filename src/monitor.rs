//! Tick driver: sample -> append -> window -> detect -> present

use std::time::{Duration, Instant};

use tokio::time::{interval, MissedTickBehavior};

use crate::config::{FaultConfig, MonitorConfig};
use crate::error::Result;
use crate::metrics::{MetricsReport, TickMetrics};
use crate::model::Label;
use crate::sensor::{AnomalyDetector, SensorGenerator, SensorReading};
use crate::store::ReadingLog;
use crate::visualization::{ConsoleReport, Frame, HtmlDashboard, Presenter};

/// What one tick produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub tick: u64,
    pub reading: SensorReading,
    pub window_len: usize,
    pub label: Option<Label>,
    pub elapsed: Duration,
}

pub struct Monitor {
    config: MonitorConfig,
    generator: SensorGenerator,
    log: ReadingLog,
    detector: AnomalyDetector,
    presenters: Vec<Box<dyn Presenter>>,
    metrics: TickMetrics,
    tick: u64,
    pending_fault: Option<FaultConfig>,
}

impl Monitor {
    pub fn new(
        config: MonitorConfig,
        generator: SensorGenerator,
        presenters: Vec<Box<dyn Presenter>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: AnomalyDetector::from_config(&config),
            log: ReadingLog::with_capacity(config.window_size),
            metrics: TickMetrics::new()?,
            pending_fault: config.fault.clone(),
            tick: 0,
            generator,
            presenters,
            config,
        })
    }

    /// Monitor with the sampler, dashboard and console log described by `config`.
    pub fn from_config(config: MonitorConfig) -> Result<Self> {
        let generator = match config.seed {
            Some(seed) => SensorGenerator::with_profile(seed, config.profile.clone()),
            None => SensorGenerator::from_entropy(config.profile.clone()),
        };
        let presenters: Vec<Box<dyn Presenter>> = vec![
            Box::new(HtmlDashboard::new(
                &config.dashboard_path,
                config.preview_rows,
                config.tick_interval(),
            )),
            Box::new(ConsoleReport::new()),
        ];
        Self::new(config, generator, presenters)
    }

    /// One pipeline pass. Does not sleep.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let tick_start = Instant::now();
        self.tick += 1;
        self.apply_fault();

        let sample_start = Instant::now();
        let reading = self.generator.generate();
        self.metrics.record_sample(sample_start.elapsed());

        self.log.append(reading);
        let window = self.log.tail(self.config.window_size);

        let label = if window.len() > self.detector.min_samples() {
            let fit_start = Instant::now();
            let label = self.detector.observe(window)?;
            self.metrics.record_fit(fit_start.elapsed());
            label
        } else {
            None
        };

        let report = self.metrics.report();
        let frame = Frame {
            tick: self.tick,
            window,
            label,
            detector_state: self.detector.state(),
            min_training_samples: self.config.min_training_samples,
            metrics: &report,
        };
        let render_start = Instant::now();
        for presenter in &mut self.presenters {
            presenter.present(&frame)?;
        }
        self.metrics.record_render(render_start.elapsed());

        let elapsed = tick_start.elapsed();
        let budget = self.config.tick_interval();
        if self.metrics.record_tick(elapsed, budget) {
            log::warn!("[TICK {}] took {:?}, over the {:?} interval", self.tick, elapsed, budget);
        }

        Ok(TickOutcome {
            tick: self.tick,
            reading,
            window_len: window.len(),
            label,
            elapsed,
        })
    }

    fn apply_fault(&mut self) {
        let due = matches!(&self.pending_fault, Some(f) if f.at_tick == self.tick);
        if !due {
            return;
        }
        if let Some(fault) = self.pending_fault.take() {
            log::warn!(
                "[TICK {}] Injecting fault: temperature {:+.1}, vibration {:+.2}",
                self.tick,
                fault.temperature_delta,
                fault.vibration_delta
            );
            self.generator
                .inject_fault(fault.temperature_delta, fault.vibration_delta);
        }
    }

    /// Tick on a fixed period until `max_ticks`, Ctrl-C, or the first error.
    pub async fn run(&mut self) -> Result<MetricsReport> {
        let mut ticker = interval(self.config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Monitoring every {:?}, window {} readings, training after {}",
            self.config.tick_interval(),
            self.config.window_size,
            self.config.min_training_samples
        );

        // One listener for the whole run so a Ctrl-C during a tick is not lost
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            if self.config.max_ticks.is_some_and(|max| self.tick >= max) {
                log::info!("Reached {} ticks, stopping", self.tick);
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut ctrl_c => {
                    log::info!("Interrupted after {} ticks", self.tick);
                    break;
                }
            }
            self.tick()?;
        }

        Ok(self.metrics.report())
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    pub fn history(&self) -> &ReadingLog {
        &self.log
    }

    /// Shared handle to the timing histograms; stays readable after `run` fails.
    pub fn metrics(&self) -> TickMetrics {
        self.metrics.clone()
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}
