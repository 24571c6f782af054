//! Control configuration parameters
//!
//! Thresholds for auto mode and the egg-turner settings.  Both live in the
//! realtime database and are edited by the user; the service treats each
//! snapshot as read-only until the next one replaces it.

use serde::{Deserialize, Serialize};

/// Milliseconds in one minute (the turner period is edited in minutes).
const MS_PER_MINUTE: f64 = 60_000.0;

/// Auto-mode thresholds (`autoMode/config`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlConfig {
    /// Ideal incubation temperature (°C).  Heater below, fan above.
    pub temperature_threshold: f32,
    /// Minimum relative humidity (%).  Mister below.
    pub humidity_threshold: f32,
    /// Reference light level (lux).  Used for deviation banding only.
    #[serde(default = "default_lux_threshold")]
    pub lux_threshold: f32,
}

fn default_lux_threshold() -> f32 {
    50.0
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            temperature_threshold: 37.5,
            humidity_threshold: 60.0,
            lux_threshold: default_lux_threshold(),
        }
    }
}

impl ControlConfig {
    /// Range check applied before the config is cached locally.
    ///
    /// The evaluator itself never validates; a `NaN` threshold simply makes
    /// every comparison false.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.temperature_threshold.is_finite() {
            return Err("temperature_threshold must be finite");
        }
        if !(0.0..=100.0).contains(&self.humidity_threshold) {
            return Err("humidity_threshold must be 0–100");
        }
        if !self.lux_threshold.is_finite() || self.lux_threshold < 0.0 {
            return Err("lux_threshold must be finite and >= 0");
        }
        Ok(())
    }
}

/// Egg-turner servo settings (`servo`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnerSettings {
    /// Whether the servo turns the eggs periodically.
    pub enabled: bool,
    /// Turning period in milliseconds.
    #[serde(default)]
    pub term: u64,
}

impl TurnerSettings {
    /// Turning period in minutes, as shown to the user.
    pub fn period_minutes(&self) -> f64 {
        self.term as f64 / MS_PER_MINUTE
    }
}

/// Convert a user-entered period in minutes to the stored milliseconds.
///
/// Returns `None` for negative or non-finite input.
pub fn minutes_to_term_ms(minutes: f64) -> Option<u64> {
    if !minutes.is_finite() || minutes < 0.0 {
        return None;
    }
    Some((minutes * MS_PER_MINUTE).round() as u64)
}
