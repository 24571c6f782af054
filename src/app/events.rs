//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) and the
//! [`SnapshotFeed`](super::feed::SnapshotFeed) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to the console, forward to a
//! telemetry collector, etc.

use crate::config::{ControlConfig, TurnerSettings};
use crate::control::ReadingBands;
use crate::error::DecodeError;
use crate::model::{Device, Mode, SensorReading};

use super::ports::StoreError;

/// Who caused a device to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// The auto-mode evaluator.
    Auto,
    /// A command from this client's user.
    User,
    /// Another writer, observed through the database.
    Remote,
}

/// What a failed write was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Device(Device),
    Mode,
    Config,
    Turner,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode and thresholds).
    Started { mode: Mode, config: ControlConfig },

    /// A new reading arrived, graded against the current thresholds.
    Reading {
        reading: SensorReading,
        bands: ReadingBands,
    },

    /// A device switched on or off.
    DeviceChanged {
        device: Device,
        on: bool,
        source: ChangeSource,
    },

    /// Auto/manual mode changed.
    ModeChanged(Mode),

    /// Threshold config replaced.
    ConfigUpdated(ControlConfig),

    /// Turner settings replaced.
    TurnerUpdated(TurnerSettings),

    /// A database write failed.  In-memory state is not rolled back.
    WriteFailed {
        target: WriteTarget,
        error: StoreError,
    },

    /// A user command was refused (reason is human-readable).
    CommandRejected(&'static str),

    /// A snapshot could not be decoded and was ignored.
    SnapshotRejected {
        path: &'static str,
        error: DecodeError,
    },
}
