//! Metrics module - Per-stage tick timings

use hdrhistogram::{CreationError, Histogram};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// TICK METRICS - Shared timing histograms
// ============================================================================

#[derive(Clone)]
pub struct TickMetrics {
    sample_hist: Arc<Mutex<Histogram<u64>>>,
    fit_hist: Arc<Mutex<Histogram<u64>>>,
    render_hist: Arc<Mutex<Histogram<u64>>>,
    tick_hist: Arc<Mutex<Histogram<u64>>>,
    ticks: Arc<AtomicU64>,
    overruns: Arc<AtomicU64>,
}

fn histogram() -> Result<Arc<Mutex<Histogram<u64>>>, CreationError> {
    Ok(Arc::new(Mutex::new(Histogram::new(3)?)))
}

impl TickMetrics {
    pub fn new() -> Result<Self, CreationError> {
        Ok(Self {
            sample_hist: histogram()?,
            fit_hist: histogram()?,
            render_hist: histogram()?,
            tick_hist: histogram()?,
            ticks: Arc::new(AtomicU64::new(0)),
            overruns: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn record_sample(&self, duration: Duration) {
        self.sample_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Fit plus classification of the newest reading
    pub fn record_fit(&self, duration: Duration) {
        self.fit_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    pub fn record_render(&self, duration: Duration) {
        self.render_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Whole tick; counts an overrun when it exceeds `budget`.
    pub fn record_tick(&self, duration: Duration, budget: Duration) -> bool {
        self.tick_hist.lock().record(duration.as_nanos() as u64).ok();
        self.ticks.fetch_add(1, Ordering::Relaxed);

        let overrun = duration > budget;
        if overrun {
            self.overruns.fetch_add(1, Ordering::Relaxed);
        }
        overrun
    }

    pub fn report(&self) -> MetricsReport {
        let sample = self.sample_hist.lock();
        let fit = self.fit_hist.lock();
        let render = self.render_hist.lock();
        let tick = self.tick_hist.lock();

        MetricsReport {
            ticks: self.ticks.load(Ordering::Relaxed),
            fits: fit.len(),
            sample_p50: Duration::from_nanos(sample.value_at_quantile(0.5)),
            fit_p50: Duration::from_nanos(fit.value_at_quantile(0.5)),
            fit_p99: Duration::from_nanos(fit.value_at_quantile(0.99)),
            render_p50: Duration::from_nanos(render.value_at_quantile(0.5)),
            render_p99: Duration::from_nanos(render.value_at_quantile(0.99)),
            tick_p50: Duration::from_nanos(tick.value_at_quantile(0.5)),
            tick_p99: Duration::from_nanos(tick.value_at_quantile(0.99)),
            overruns: self.overruns.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// METRICS REPORT - Summary statistics
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsReport {
    pub ticks: u64,
    pub fits: u64,
    pub sample_p50: Duration,
    pub fit_p50: Duration,
    pub fit_p99: Duration,
    pub render_p50: Duration,
    pub render_p99: Duration,
    pub tick_p50: Duration,
    pub tick_p99: Duration,
    pub overruns: u64,
}
