//! Runtime configuration loaded from TOML

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config/monitor_config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub tick_interval_ms: u64,
    /// Readings visible to the detector and the dashboard
    pub window_size: usize,
    /// The detector trains once the window holds more than this many readings
    pub min_training_samples: usize,
    pub preview_rows: usize,
    pub dashboard_path: String,
    /// Sampler seed; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Stop after this many ticks; `None` runs until interrupted
    pub max_ticks: Option<u64>,
    pub detector: DetectorConfig,
    pub profile: ProfileConfig,
    pub fault: Option<FaultConfig>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            window_size: 200,
            min_training_samples: 30,
            preview_rows: 5,
            dashboard_path: "dashboard.html".to_string(),
            seed: None,
            max_ticks: None,
            detector: DetectorConfig::default(),
            profile: ProfileConfig::default(),
            fault: None,
        }
    }
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be greater than zero"));
        }
        if self.window_size == 0 {
            return Err(invalid("window_size", "must be greater than zero"));
        }
        if self.min_training_samples >= self.window_size {
            return Err(invalid(
                "min_training_samples",
                format!(
                    "{} never trains with a window of {}",
                    self.min_training_samples, self.window_size
                ),
            ));
        }
        if let Some(fault) = &self.fault {
            if fault.at_tick == 0 {
                return Err(invalid("fault.at_tick", "ticks start at 1"));
            }
        }
        if self.detector.n_trees == 0 {
            return Err(invalid("detector.n_trees", "must be greater than zero"));
        }
        if self.detector.max_samples < 2 {
            return Err(invalid("detector.max_samples", "must be at least 2"));
        }
        let c = self.detector.contamination;
        if !(c > 0.0 && c <= 0.5) {
            return Err(invalid("detector.contamination", format!("{c} not in (0, 0.5]")));
        }
        let p = &self.profile;
        for (field, std) in [
            ("profile.temperature_std", p.temperature_std),
            ("profile.vibration_std", p.vibration_std),
            ("profile.current_std", p.current_std),
            ("profile.power_factor_std", p.power_factor_std),
        ] {
            if !(std >= 0.0 && std.is_finite()) {
                return Err(invalid(field, format!("{std} is not a valid deviation")));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    pub n_trees: usize,
    pub max_samples: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

/// Distribution parameters of the simulated machine
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    pub temperature_mean: f64,
    pub temperature_std: f64,
    pub vibration_mean: f64,
    pub vibration_std: f64,
    pub current_mean: f64,
    pub current_std: f64,
    pub power_factor_mean: f64,
    pub power_factor_std: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            temperature_mean: 75.0,
            temperature_std: 5.0,
            vibration_mean: 2.0,
            vibration_std: 0.5,
            current_mean: 15.0,
            current_std: 3.0,
            power_factor_mean: 0.75,
            power_factor_std: 0.05,
        }
    }
}

/// Shift the sampler's means at a given tick
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FaultConfig {
    pub at_tick: u64,
    #[serde(default)]
    pub temperature_delta: f64,
    #[serde(default)]
    pub vibration_delta: f64,
}

pub fn load_config(path: impl AsRef<Path>) -> Result<MonitorConfig, ConfigError> {
    let path = path.as_ref();
    let config = match std::fs::read_to_string(path) {
        Ok(s) => toml::from_str::<MonitorConfig>(&s)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No config at {}, using defaults", path.display());
            MonitorConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
            tick_interval_ms = 250
            [detector]
            contamination = 0.05
            "#,
        )
        .unwrap();

        assert_eq!(cfg.tick_interval(), Duration::from_millis(250));
        assert_eq!(cfg.window_size, 200);
        assert_eq!(cfg.detector.contamination, 0.05);
        assert_eq!(cfg.detector.n_trees, 100);
        assert!(cfg.fault.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn fault_section_parses() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
            [fault]
            at_tick = 90
            temperature_delta = 25.0
            "#,
        )
        .unwrap();

        let fault = cfg.fault.unwrap();
        assert_eq!(fault.at_tick, 90);
        assert_eq!(fault.temperature_delta, 25.0);
        assert_eq!(fault.vibration_delta, 0.0);
    }

    #[test]
    fn rejects_bad_contamination() {
        let mut cfg = MonitorConfig::default();
        cfg.detector.contamination = 0.9;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "detector.contamination", .. })
        ));
    }

    #[test]
    fn rejects_zero_window() {
        let cfg = MonitorConfig { window_size: 0, ..MonitorConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_training_threshold_outside_window() {
        let cfg = MonitorConfig {
            window_size: 20,
            min_training_samples: 30,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "min_training_samples", .. })
        ));

        let cfg = MonitorConfig { window_size: 31, ..MonitorConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_fault_at_tick_zero() {
        let cfg = MonitorConfig {
            fault: Some(FaultConfig { at_tick: 0, temperature_delta: 10.0, vibration_delta: 0.0 }),
            ..MonitorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "fault.at_tick", .. })
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config("does/not/exist.toml").unwrap();
        assert_eq!(cfg, MonitorConfig::default());
    }
}
