//! Deviation banding
//!
//! Classifies how far a reading sits from its configured threshold.  The
//! bands drive the dashboard's green/yellow/red indicator and the telemetry
//! log; they have no effect on actuator control.

use crate::config::ControlConfig;
use crate::model::SensorReading;

/// Distance class of a value from its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeviationBand {
    /// Close to ideal.
    Nominal,
    /// Slightly off.
    Drifting,
    /// Far from ideal (or not a number).
    Alarm,
}

/// A measured quantity with its own band widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Humidity,
    Lux,
}

impl Metric {
    /// `(nominal, drifting)` half-widths around the threshold.
    const fn widths(self) -> (f32, f32) {
        match self {
            Self::Temperature => (1.0, 3.0),
            Self::Humidity => (10.0, 20.0),
            Self::Lux => (50.0, 150.0),
        }
    }
}

/// Band of `value` relative to `threshold` for the given metric.
pub fn classify(metric: Metric, value: f32, threshold: f32) -> DeviationBand {
    let delta = (value - threshold).abs();
    if !delta.is_finite() {
        return DeviationBand::Alarm;
    }
    let (nominal, drifting) = metric.widths();
    if delta <= nominal {
        DeviationBand::Nominal
    } else if delta <= drifting {
        DeviationBand::Drifting
    } else {
        DeviationBand::Alarm
    }
}

/// Bands for every metric of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingBands {
    pub temperature: DeviationBand,
    pub humidity: DeviationBand,
    pub lux: DeviationBand,
}

impl ReadingBands {
    pub fn of(reading: &SensorReading, config: &ControlConfig) -> Self {
        Self {
            temperature: classify(
                Metric::Temperature,
                reading.temperature,
                config.temperature_threshold,
            ),
            humidity: classify(Metric::Humidity, reading.humidity, config.humidity_threshold),
            lux: classify(Metric::Lux, reading.lux, config.lux_threshold),
        }
    }

    /// The most severe band across all metrics.
    pub fn worst(&self) -> DeviationBand {
        self.temperature.max(self.humidity).max(self.lux)
    }
}
