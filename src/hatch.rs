//! Hatch-cycle records and incubation assessment.
//!
//! A hatch cycle tracks one batch of eggs from setting to hatching.  Only
//! one cycle is `doing` at a time.  While it runs, the sensor history since
//! its start date is averaged and judged against the incubation window
//! (37–39 °C, 55–65 % RH).

use serde::{Deserialize, Serialize};

use crate::error::HatchError;
use crate::model::SensorReading;

/// Chicken-egg incubation period.
pub const INCUBATION_DAYS: u64 = 21;

const SECS_PER_DAY: u64 = 86_400;

/// Stable incubation temperature window (°C, inclusive).
const STABLE_TEMPERATURE: (f64, f64) = (37.0, 39.0);

/// Stable relative-humidity window (%, inclusive).
const STABLE_HUMIDITY: (f64, f64) = (55.0, 65.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HatchStatus {
    /// In progress.
    Doing,
    /// Hatched.
    Done,
    /// Abandoned.
    Destroy,
}

/// A stored hatch cycle.  Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HatchCycle {
    pub id: String,
    pub name: String,
    pub start_date: u64,
    pub expected_date: u64,
    pub number_of_eggs: u32,
    pub status: HatchStatus,
}

impl HatchCycle {
    /// Whole days since the cycle started.
    pub fn days_elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_date) / SECS_PER_DAY
    }

    /// Whole days until the expected hatch date (0 once it has passed).
    pub fn days_remaining(&self, now: u64) -> u64 {
        self.expected_date.saturating_sub(now).div_ceil(SECS_PER_DAY)
    }
}

/// A cycle that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHatchCycle {
    pub name: String,
    pub start_date: u64,
    pub expected_date: u64,
    pub number_of_eggs: u32,
}

impl NewHatchCycle {
    /// Validate the form input and schedule the hatch [`INCUBATION_DAYS`] out.
    pub fn new(name: &str, number_of_eggs: u32, now: u64) -> Result<Self, HatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HatchError::EmptyName);
        }
        if number_of_eggs == 0 {
            return Err(HatchError::NoEggs);
        }
        Ok(Self {
            name: name.to_string(),
            start_date: now,
            expected_date: now.saturating_add(INCUBATION_DAYS * SECS_PER_DAY),
            number_of_eggs,
        })
    }

    /// Attach the id assigned by the store.
    pub fn into_cycle(self, id: String) -> HatchCycle {
        HatchCycle {
            id,
            name: self.name,
            start_date: self.start_date,
            expected_date: self.expected_date,
            number_of_eggs: self.number_of_eggs,
            status: HatchStatus::Doing,
        }
    }
}

/// A historical reading with its timestamp (Unix seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRecord {
    pub reading: SensorReading,
    pub timestamp: u64,
}

/// Verdict on the incubation conditions of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Stable,
    TemperatureOutOfRange,
    HumidityOutOfRange,
    BothOutOfRange,
    /// No readings since the cycle started.
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSummary {
    /// Readings that fell inside the cycle.
    pub samples: usize,
    /// Mean temperature, rounded to one decimal.
    pub avg_temperature: Option<f64>,
    /// Mean humidity, rounded to one decimal.
    pub avg_humidity: Option<f64>,
    pub assessment: Assessment,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn within((lo, hi): (f64, f64), v: f64) -> bool {
    v >= lo && v <= hi
}

/// Judge averaged conditions against the incubation window.
pub fn assess(avg_temperature: f64, avg_humidity: f64) -> Assessment {
    let temperature_ok = within(STABLE_TEMPERATURE, avg_temperature);
    let humidity_ok = within(STABLE_HUMIDITY, avg_humidity);
    match (temperature_ok, humidity_ok) {
        (true, true) => Assessment::Stable,
        (false, false) => Assessment::BothOutOfRange,
        (false, true) => Assessment::TemperatureOutOfRange,
        (true, false) => Assessment::HumidityOutOfRange,
    }
}

/// Average the readings taken since `cycle` started and assess them.
///
/// Averages are rounded to one decimal before assessment, so 36.96 °C
/// counts as 37.0 and is inside the window.
pub fn summarize(cycle: &HatchCycle, history: &[SensorRecord]) -> CycleSummary {
    let (samples, t_sum, h_sum) = history
        .iter()
        .filter(|r| r.timestamp >= cycle.start_date)
        .fold((0usize, 0.0f64, 0.0f64), |(n, t, h), r| {
            (
                n + 1,
                t + f64::from(r.reading.temperature),
                h + f64::from(r.reading.humidity),
            )
        });

    if samples == 0 {
        return CycleSummary {
            samples,
            avg_temperature: None,
            avg_humidity: None,
            assessment: Assessment::InsufficientData,
        };
    }

    let avg_t = round1(t_sum / samples as f64);
    let avg_h = round1(h_sum / samples as f64);
    CycleSummary {
        samples,
        avg_temperature: Some(avg_t),
        avg_humidity: Some(avg_h),
        assessment: assess(avg_t, avg_h),
    }
}
