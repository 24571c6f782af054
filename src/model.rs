//! Core data types shared by the evaluator, the service and the adapters.
//!
//! Everything here is a plain `Copy` value.  Snapshots arrive from the
//! database, are decoded into these types, and are never mutated in place;
//! the next snapshot simply supersedes the previous one.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sensor reading
// ---------------------------------------------------------------------------

/// A point-in-time reading published by the incubator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Air temperature inside the incubator (°C).
    pub temperature: f32,
    /// Relative humidity (%).
    pub humidity: f32,
    /// Ambient light (lux).  Displayed only; not a control input.
    #[serde(default)]
    pub lux: f32,
}

impl SensorReading {
    pub const fn new(temperature: f32, humidity: f32, lux: f32) -> Self {
        Self {
            temperature,
            humidity,
            lux,
        }
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// Actuators driven by the control evaluator.
///
/// The egg turner is configured separately through
/// [`TurnerSettings`](crate::config::TurnerSettings); it has no threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Heater,
    Fan,
    Mister,
}

impl Device {
    /// Every controllable device, in evaluation order.
    pub const ALL: [Device; 3] = [Device::Heater, Device::Fan, Device::Mister];

    /// Node name under `devices/` in the realtime database.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Heater => "LED",
            Self::Fan => "FAN",
            Self::Mister => "Mist",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heater => write!(f, "heater"),
            Self::Fan => write!(f, "fan"),
            Self::Mister => write!(f, "mister"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator states
// ---------------------------------------------------------------------------

/// On/off state of every controllable device.  Default: all off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorStates {
    pub heater: bool,
    pub fan: bool,
    pub mister: bool,
}

impl ActuatorStates {
    pub const fn get(&self, device: Device) -> bool {
        match device {
            Device::Heater => self.heater,
            Device::Fan => self.fan,
            Device::Mister => self.mister,
        }
    }

    pub fn set(&mut self, device: Device, on: bool) {
        match device {
            Device::Heater => self.heater = on,
            Device::Fan => self.fan = on,
            Device::Mister => self.mister = on,
        }
    }

    /// Copy with a single device changed.
    #[must_use]
    pub fn with(mut self, device: Device, on: bool) -> Self {
        self.set(device, on);
        self
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Who is in charge of the actuators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Actuators follow the threshold rules.
    #[default]
    Auto,
    /// Actuators change only on explicit user action.
    Manual,
}

impl Mode {
    /// Wire form: the database stores `autoMode/isAutoMode` as a boolean.
    pub const fn from_auto_flag(is_auto: bool) -> Self {
        if is_auto { Self::Auto } else { Self::Manual }
    }

    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Auto => Self::Manual,
            Self::Manual => Self::Auto,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}
