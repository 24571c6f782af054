//! Auto-mode threshold evaluator
//!
//! Pure function of (latest reading, thresholds, current actuator states,
//! mode).  No I/O and no memory across readings: the caller owns every
//! input and applies the returned transitions through its ports.
//!
//! Rules, per device and independently:
//!
//! | Device | On when                                  |
//! |--------|------------------------------------------|
//! | Heater | `temperature <  temperature_threshold`   |
//! | Fan    | `temperature >  temperature_threshold`   |
//! | Mister | `humidity    <  humidity_threshold`      |
//!
//! At exactly the temperature threshold both heater and fan are off.
//! Non-finite inputs make every comparison false, so all devices go off.

use heapless::Vec;

use crate::config::ControlConfig;
use crate::model::{ActuatorStates, Device, Mode, SensorReading};

/// A device whose desired state differs from its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub device: Device,
    pub on: bool,
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Desired state of every device.
    pub desired: ActuatorStates,
    /// Devices that must change, in [`Device::ALL`] order.
    pub transitions: Vec<Transition, 3>,
}

impl Evaluation {
    /// Nothing to do: desired equals current.
    pub fn is_noop(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Desired state of a single device under the auto-mode rules.
pub fn desired_state(device: Device, reading: &SensorReading, config: &ControlConfig) -> bool {
    match device {
        Device::Heater => reading.temperature < config.temperature_threshold,
        Device::Fan => reading.temperature > config.temperature_threshold,
        Device::Mister => reading.humidity < config.humidity_threshold,
    }
}

/// Evaluate the rules against the latest reading.
///
/// In [`Mode::Manual`] the current states are returned unchanged.
pub fn evaluate(
    reading: &SensorReading,
    config: &ControlConfig,
    current: &ActuatorStates,
    mode: Mode,
) -> Evaluation {
    if !mode.is_auto() {
        return Evaluation {
            desired: *current,
            transitions: Vec::new(),
        };
    }

    let mut desired = *current;
    let mut transitions = Vec::new();
    for device in Device::ALL {
        let on = desired_state(device, reading, config);
        desired.set(device, on);
        if on != current.get(device) {
            // Capacity equals Device::ALL.len(); push cannot fail.
            let _ = transitions.push(Transition { device, on });
        }
    }

    Evaluation {
        desired,
        transitions,
    }
}
