use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::config::ProfileConfig;

/// Number of model features per reading
pub const FEATURE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub sequence_id: u64,
    pub timestamp: DateTime<Local>,
    pub temperature_c: f64,
    pub vibration_mm_s: f64,
    pub current_a: f64,
    pub power_kw: f64,
}

impl SensorReading {
    /// Feature vector in model order: temperature, vibration, current, power.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.temperature_c, self.vibration_mm_s, self.current_a, self.power_kw]
    }
}

pub struct SensorGenerator {
    rng: StdRng,
    sequence_counter: u64,
    pub profile: ProfileConfig,
}

impl SensorGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_profile(seed, ProfileConfig::default())
    }

    pub fn with_profile(seed: u64, profile: ProfileConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sequence_counter: 0,
            profile,
        }
    }

    pub fn from_entropy(profile: ProfileConfig) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            sequence_counter: 0,
            profile,
        }
    }

    pub fn generate(&mut self) -> SensorReading {
        self.sequence_counter += 1;
        let p = &self.profile;
        let (t_mean, t_std) = (p.temperature_mean, p.temperature_std);
        let (v_mean, v_std) = (p.vibration_mean, p.vibration_std);
        let (c_mean, c_std) = (p.current_mean, p.current_std);
        let (f_mean, f_std) = (p.power_factor_mean, p.power_factor_std);

        let temperature_c = self.normal(t_mean, t_std);
        let vibration_mm_s = self.normal(v_mean, v_std);
        let current_a = self.normal(c_mean, c_std);
        let power_kw = current_a * self.normal(f_mean, f_std);

        SensorReading {
            sequence_id: self.sequence_counter,
            timestamp: Local::now(),
            temperature_c,
            vibration_mm_s,
            current_a,
            power_kw,
        }
    }

    fn normal(&mut self, mean: f64, std: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std * z
    }

    pub fn sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Shift the temperature and vibration means (simulated wear).
    pub fn inject_fault(&mut self, temperature_delta: f64, vibration_delta: f64) {
        self.profile.temperature_mean += temperature_delta;
        self.profile.vibration_mean += vibration_delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_values() {
        let mut a = SensorGenerator::new(7);
        let mut b = SensorGenerator::new(7);
        for _ in 0..10 {
            assert_eq!(a.generate().features(), b.generate().features());
        }
    }

    #[test]
    fn zero_deviation_yields_means() {
        let profile = ProfileConfig {
            temperature_std: 0.0,
            vibration_std: 0.0,
            current_std: 0.0,
            power_factor_std: 0.0,
            ..ProfileConfig::default()
        };
        let r = SensorGenerator::with_profile(1, profile).generate();
        assert_eq!(r.features(), [75.0, 2.0, 15.0, 15.0 * 0.75]);
    }
}
