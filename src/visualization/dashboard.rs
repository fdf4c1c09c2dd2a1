//! Self-refreshing HTML dashboard with SVG charts

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use plotters::prelude::*;

use super::{Frame, Presenter};
use crate::error::{MonitorError, Result};
use crate::model::Label;
use crate::sensor::{DetectorState, SensorReading};

const CHART_SIZE: (u32, u32) = (900, 320);
const TITLE: &str = "Real-Time Sensor Data with AI Anomaly Detection";

struct Series {
    name: &'static str,
    value: fn(&SensorReading) -> f64,
    color: RGBColor,
}

fn temperature(r: &SensorReading) -> f64 {
    r.temperature_c
}

fn vibration(r: &SensorReading) -> f64 {
    r.vibration_mm_s
}

fn current(r: &SensorReading) -> f64 {
    r.current_a
}

fn power(r: &SensorReading) -> f64 {
    r.power_kw
}

const THERMAL: [Series; 2] = [
    Series { name: "temperature (C)", value: temperature, color: RED },
    Series { name: "vibration (mm/s)", value: vibration, color: BLUE },
];

const ELECTRICAL: [Series; 2] = [
    Series { name: "current (A)", value: current, color: MAGENTA },
    Series { name: "power (kW)", value: power, color: GREEN },
];

pub struct HtmlDashboard {
    path: PathBuf,
    preview_rows: usize,
    refresh: Duration,
}

impl HtmlDashboard {
    pub fn new(path: impl Into<PathBuf>, preview_rows: usize, refresh: Duration) -> Self {
        Self {
            path: path.into(),
            preview_rows,
            refresh,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render_html(&self, frame: &Frame<'_>) -> Result<String> {
        let refresh_secs = self.refresh.as_secs_f64().ceil().max(1.0) as u64;
        let mut html = String::with_capacity(64 * 1024);

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
             <meta http-equiv=\"refresh\" content=\"{refresh_secs}\">\
             <title>Predictive Maintenance</title><style>{STYLE}</style></head>\n<body>\n\
             <h1>&#9889; {TITLE}</h1>\n"
        );

        if frame.window.is_empty() {
            html.push_str("<p class=\"muted\">No readings yet.</p>\n");
        } else {
            html.push_str("<div class=\"charts\">\n");
            html.push_str(&render_chart(frame.window, "Temperature & vibration", &THERMAL)?);
            html.push_str(&render_chart(frame.window, "Current & power", &ELECTRICAL)?);
            html.push_str("</div>\n");
            html.push_str(&self.preview_table(frame.window));
        }

        html.push_str(&alert_section(frame));
        html.push_str(&footer(frame));
        html.push_str("</body></html>\n");
        Ok(html)
    }

    fn preview_table(&self, window: &[SensorReading]) -> String {
        let start = window.len().saturating_sub(self.preview_rows);
        let mut table = String::from(
            "<table>\n<tr><th>#</th><th>timestamp</th><th>temperature_C</th>\
             <th>vibration_mm_s</th><th>current_A</th><th>power_kW</th></tr>\n",
        );
        for r in &window[start..] {
            let _ = writeln!(
                table,
                "<tr><td>{}</td><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td></tr>",
                r.sequence_id,
                r.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                r.temperature_c,
                r.vibration_mm_s,
                r.current_a,
                r.power_kw
            );
        }
        table.push_str("</table>\n");
        table
    }
}

impl Presenter for HtmlDashboard {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let html = self.render_html(frame)?;
        // Browsers refresh mid-write; swap the whole file in at once
        let tmp = self.path.with_extension("html.tmp");
        fs::write(&tmp, html)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn alert_section(frame: &Frame<'_>) -> String {
    let body = match frame.label {
        Some(Label::Anomaly) => {
            "<div class=\"alert anomaly\">&#9888; AI Model: Anomaly detected! Possible failure risk.</div>"
                .to_string()
        }
        Some(Label::Normal) => {
            "<div class=\"alert normal\">&#9989; AI Model: Machine operating normally.</div>".to_string()
        }
        None => format!(
            "<p class=\"muted\">Collecting readings before training ({}/{}).</p>",
            frame.window.len(),
            frame.min_training_samples + 1
        ),
    };
    format!("<section>\n<h2>AI Predictive Maintenance Alerts</h2>\n{body}\n</section>\n")
}

fn footer(frame: &Frame<'_>) -> String {
    let m = frame.metrics;
    let model = match frame.detector_state {
        DetectorState::Untrained => "untrained",
        DetectorState::Trained => "trained",
    };
    format!(
        "<footer>tick {} &middot; model {model} ({} fits) &middot; fit p50 {:?} p99 {:?} &middot; \
         render p50 {:?} &middot; tick p99 {:?} &middot; overruns {}</footer>\n",
        frame.tick, m.fits, m.fit_p50, m.fit_p99, m.render_p50, m.tick_p99, m.overruns
    )
}

fn render_err(e: impl std::fmt::Display) -> MonitorError {
    MonitorError::Render(e.to_string())
}

fn render_chart(window: &[SensorReading], caption: &str, series: &[Series]) -> Result<String> {
    let (x_lo, x_hi) = padded_range(window.iter().map(|r| r.sequence_id as f64), 0.0);
    let (y_lo, y_hi) = padded_range(
        series.iter().flat_map(|s| window.iter().map(s.value)),
        0.05,
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("reading")
            .draw()
            .map_err(render_err)?;

        for s in series {
            let color = s.color;
            chart
                .draw_series(LineSeries::new(
                    window.iter().map(|r| (r.sequence_id as f64, (s.value)(r))),
                    &color,
                ))
                .map_err(render_err)?
                .label(s.name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Min/max of `values` widened by `pad` of the span; never empty.
fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let margin = (hi - lo) * pad;
    (lo - margin, hi + margin)
}

const STYLE: &str = "body{font-family:sans-serif;margin:24px;background:#fafafa}\
.charts svg{display:block;margin-bottom:12px;background:#fff}\
table{border-collapse:collapse;margin:12px 0}\
td,th{border:1px solid #ccc;padding:4px 8px;text-align:right}\
.alert{padding:12px;border-radius:4px;font-weight:bold}\
.anomaly{background:#fde2e1;color:#a61b1b}\
.normal{background:#e3f6e5;color:#1d6b2b}\
.muted{color:#777}footer{margin-top:16px;color:#777;font-size:12px}";
