use std::process::ExitCode;

use predictive_maintenance::config::{load_config, DEFAULT_CONFIG_PATH};
use predictive_maintenance::error::Result;
use predictive_maintenance::metrics::MetricsReport;
use predictive_maintenance::monitor::Monitor;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    println!("===========================================");
    println!("Starting Predictive Maintenance Monitor");
    println!("===========================================\n");

    let monitor = match build(&config_path) {
        Ok(monitor) => monitor,
        Err(e) => {
            log::error!("Monitor failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };
    let metrics = monitor.metrics();

    match run(monitor) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Monitor stopped: {e}");
            print_report(&metrics.report());
            ExitCode::FAILURE
        }
    }
}

fn build(config_path: &str) -> Result<Monitor> {
    let config = load_config(config_path)?;
    log::info!("Dashboard: open {} in a browser", config.dashboard_path);
    Monitor::from_config(config)
}

fn run(mut monitor: Monitor) -> Result<MetricsReport> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(monitor.run())
}

fn print_report(report: &MetricsReport) {
    println!("\n===========================================");
    println!("FINAL MONITOR RESULTS");
    println!("===========================================");
    println!("Ticks: {} ({} overran the interval)", report.ticks, report.overruns);
    println!("Model fits: {}", report.fits);
    println!("Sampling P50: {:?}", report.sample_p50);
    println!("Fit P50: {:?}, P99: {:?}", report.fit_p50, report.fit_p99);
    println!("Render P50: {:?}, P99: {:?}", report.render_p50, report.render_p99);
    println!("Tick P50: {:?}, P99: {:?}", report.tick_p50, report.tick_p99);
}
