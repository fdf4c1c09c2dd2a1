//! Integration tests for the predictive maintenance monitor

use chrono::Local;
use predictive_maintenance::{
    AnomalyDetector, DetectorState, HtmlDashboard, Label, Monitor, MonitorConfig, Presenter,
    ReadingLog, SensorGenerator, SensorReading,
};
use std::time::Duration;

fn reading(temperature_c: f64, vibration_mm_s: f64, current_a: f64, power_kw: f64) -> SensorReading {
    SensorReading {
        sequence_id: 0,
        timestamp: Local::now(),
        temperature_c,
        vibration_mm_s,
        current_a,
        power_kw,
    }
}

fn headless_monitor(seed: u64) -> Monitor {
    let config = MonitorConfig { seed: Some(seed), ..MonitorConfig::default() };
    Monitor::new(config, SensorGenerator::new(seed), Vec::new()).expect("valid config")
}

// ============================================================================
// SENSOR TESTS
// ============================================================================

#[test]
fn test_sensor_generates_plausible_values() {
    let mut gen = SensorGenerator::new(42);

    for _ in 0..1000 {
        let r = gen.generate();
        // Six standard deviations either side of each mean
        assert!((45.0..105.0).contains(&r.temperature_c), "temperature {}", r.temperature_c);
        assert!((-1.0..5.0).contains(&r.vibration_mm_s), "vibration {}", r.vibration_mm_s);
        assert!((-3.0..33.0).contains(&r.current_a), "current {}", r.current_a);
        let factor = r.power_kw / r.current_a;
        assert!((0.45..1.05).contains(&factor), "power factor {factor}");
    }
}

#[test]
fn test_sensor_means_match_profile() {
    let mut gen = SensorGenerator::new(9);
    let n = 5000;
    let readings: Vec<SensorReading> = (0..n).map(|_| gen.generate()).collect();
    let mean = |f: fn(&SensorReading) -> f64| readings.iter().map(f).sum::<f64>() / n as f64;

    assert!((mean(|r| r.temperature_c) - 75.0).abs() < 0.5);
    assert!((mean(|r| r.vibration_mm_s) - 2.0).abs() < 0.05);
    assert!((mean(|r| r.current_a) - 15.0).abs() < 0.3);
    assert!((mean(|r| r.power_kw) - 15.0 * 0.75).abs() < 0.3);
}

#[test]
fn test_sensor_sequence_increments() {
    let mut gen = SensorGenerator::new(42);

    for expected_id in 1..=10 {
        let reading = gen.generate();
        assert_eq!(reading.sequence_id, expected_id, "Sequence should increment");
    }
    assert_eq!(gen.sequence(), 10);
}

// ============================================================================
// WINDOW STORE TESTS
// ============================================================================

#[test]
fn test_tail_returns_most_recent_in_order() {
    let mut gen = SensorGenerator::new(1);
    let mut log = ReadingLog::new();

    for total in 1..=260u64 {
        log.append(gen.generate());
        let window = log.tail(200);

        assert_eq!(window.len() as u64, total.min(200));
        assert_eq!(window.last().map(|r| r.sequence_id), Some(total));
        assert!(window.windows(2).all(|w| w[1].sequence_id == w[0].sequence_id + 1));
    }
    assert_eq!(log.len(), 260);
}

// ============================================================================
// DETECTOR TESTS
// ============================================================================

#[test]
fn test_detector_trains_on_tick_31() {
    let mut monitor = headless_monitor(42);

    for tick in 1..=35u64 {
        let outcome = monitor.tick().unwrap();
        assert_eq!(outcome.tick, tick);

        if tick <= 30 {
            assert_eq!(monitor.detector().state(), DetectorState::Untrained, "tick {tick}");
            assert_eq!(outcome.label, None);
        } else {
            assert_eq!(monitor.detector().state(), DetectorState::Trained, "tick {tick}");
            assert!(outcome.label.is_some());
        }
    }
    assert_eq!(monitor.detector().fit_count(), 5);
}

#[test]
fn test_classify_returns_single_label() {
    let mut gen = SensorGenerator::new(3);
    let window: Vec<SensorReading> = (0..200).map(|_| gen.generate()).collect();
    let mut detector = AnomalyDetector::from_config(&MonitorConfig::default());
    detector.fit(&window).unwrap();

    for r in (0..100).map(|_| gen.generate()) {
        let label = detector.classify(&r).unwrap();
        assert!(matches!(label, Label::Normal | Label::Anomaly));
        assert_ne!(label.is_anomaly(), label == Label::Normal);
    }
}

#[test]
fn test_overheating_reading_is_flagged() {
    let mut gen = SensorGenerator::new(42);
    let mut log = ReadingLog::new();
    for _ in 0..200 {
        log.append(gen.generate());
    }
    let mut detector = AnomalyDetector::from_config(&MonitorConfig::default());
    assert!(detector.observe(log.tail(200)).unwrap().is_some());

    let typical = reading(75.0, 2.0, 15.0, 11.25);
    let overheating = reading(160.0, 9.0, 40.0, 40.0);
    let batch = [typical, typical, overheating, typical, typical];
    let labels: Vec<Label> = batch.iter().map(|r| detector.classify(r).unwrap()).collect();

    assert_eq!(labels[2], Label::Anomaly);
    assert_eq!(labels[0], Label::Normal);
    assert!(detector.score(&overheating).unwrap() > detector.score(&typical).unwrap());
}

// ============================================================================
// DASHBOARD TESTS
// ============================================================================

#[test]
fn test_dashboard_written_each_tick() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.html");
    let config = MonitorConfig {
        dashboard_path: path.display().to_string(),
        ..MonitorConfig::default()
    };
    let dashboard = HtmlDashboard::new(&path, config.preview_rows, config.tick_interval());
    let presenters: Vec<Box<dyn Presenter>> = vec![Box::new(dashboard)];
    let mut monitor = Monitor::new(config, SensorGenerator::new(5), presenters).unwrap();

    monitor.tick().unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("<svg"));
    assert!(html.contains("Collecting readings before training (1/31)"));
    assert!(!html.contains("alert normal"));

    for _ in 0..40 {
        monitor.tick().unwrap();
    }
    let html = std::fs::read_to_string(&path).unwrap();
    let alerts = html.matches("class=\"alert ").count();
    assert_eq!(alerts, 1, "exactly one alert state is shown");
    assert_eq!(html.matches("<tr><td>").count(), 5, "five preview rows");
    assert!(html.contains("content=\"1\""));
    assert!(!dir.path().join("dashboard.html.tmp").exists());
}

// ============================================================================
// TIMING TESTS
// ============================================================================

#[test]
fn test_full_window_tick_fits_in_interval() {
    let mut monitor = headless_monitor(11);
    for _ in 0..200 {
        monitor.tick().unwrap();
    }
    let outcome = monitor.tick().unwrap();
    assert_eq!(outcome.window_len, 200);
    assert!(outcome.elapsed < Duration::from_secs(1), "tick took {:?}", outcome.elapsed);
}
