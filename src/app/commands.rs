//! Inbound commands to the control service.
//!
//! These represent actions requested by the user through the dashboard
//! (switches, config form, turner form) that the
//! [`ControlService`](super::service::ControlService) interprets and acts upon.

use crate::config::ControlConfig;
use crate::model::{Device, Mode};

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Flip a device's current state.
    ToggleDevice(Device),

    /// Drive a device to an explicit state.
    SetDevice { device: Device, on: bool },

    /// Switch between auto and manual mode.
    SetMode(Mode),

    /// Flip the current mode.
    ToggleMode,

    /// Replace the auto-mode thresholds.
    UpdateConfig(ControlConfig),

    /// Enable or disable periodic egg turning.
    SetTurnerEnabled(bool),

    /// Set the egg-turning period, in minutes.
    SetTurnerPeriodMinutes(f64),
}
