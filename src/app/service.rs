//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns every input of the auto-mode evaluator as
//! explicit state (last reading, thresholds, mode, known actuator states)
//! and re-evaluates whenever one of them changes.  All I/O flows through
//! port traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!  SnapshotFeed ──▶ ┌────────────────────────┐ ──▶ ActuatorStore / ModeStore
//!                   │     ControlService     │ ──▶ Announcer
//!  AppCommand   ──▶ │  evaluate() · state    │ ──▶ EventSink
//!                   └────────────────────────┘
//! ```
//!
//! Writes are optimistic: the in-memory state changes first, and a failed
//! write is logged and reported but never rolled back or retried.
//! Successful device writes are remembered until their echo comes back
//! through the subscriptions, so only other writers count as remote.

use heapless::Deque;
use log::{debug, info, warn};

use crate::announce::{self, Locale};
use crate::config::{ControlConfig, TurnerSettings, minutes_to_term_ms};
use crate::control::{ReadingBands, evaluate};
use crate::model::{ActuatorStates, Device, Mode, SensorReading};

use super::commands::AppCommand;
use super::events::{AppEvent, ChangeSource, WriteTarget};
use super::ports::{
    ActuatorStore, Announcer, ConfigPort, EventSink, ModeStore, RealtimeStore,
};

/// Own device writes remembered per device while awaiting their echo.
const PENDING_ECHOES: usize = 4;

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    config: ControlConfig,
    mode: Mode,
    devices: ActuatorStates,
    last_reading: Option<SensorReading>,
    turner: TurnerSettings,
    locale: Locale,
    /// Auto-mode evaluations run since startup.
    evaluations: u64,
    config_dirty: bool,
    /// Values written per device, oldest first, not yet echoed back.
    pending_echoes: [Deque<bool, PENDING_ECHOES>; 3],
}

impl ControlService {
    /// Construct the service from the last known thresholds.
    ///
    /// Starts in auto mode with every device off until
    /// [`sync_from`](Self::sync_from) or the first snapshots say otherwise.
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            mode: Mode::default(),
            devices: ActuatorStates::default(),
            last_reading: None,
            turner: TurnerSettings::default(),
            locale: Locale::default(),
            evaluations: 0,
            config_dirty: false,
            pending_echoes: core::array::from_fn(|_| Deque::new()),
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup on the event sink.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            mode: self.mode,
            config: self.config,
        });
        info!("ControlService started in {} mode", self.mode);
    }

    /// Seed mode and device states from the store.
    ///
    /// Read failures keep the current value; the subscriptions will correct
    /// it once they deliver.
    pub fn sync_from(&mut self, store: &(impl ActuatorStore + ModeStore)) {
        match store.get_mode() {
            Ok(mode) => self.mode = mode,
            Err(e) => warn!("Mode read failed ({}), keeping {}", e, self.mode),
        }
        for device in Device::ALL {
            match store.get_device(device) {
                Ok(on) => self.devices.set(device, on),
                Err(e) => warn!("State read for {} failed: {}", device, e),
            }
        }
    }

    // ── Snapshot handlers ─────────────────────────────────────

    /// A new sensor reading arrived.
    pub fn on_reading(
        &mut self,
        reading: SensorReading,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        self.last_reading = Some(reading);
        sink.emit(&AppEvent::Reading {
            reading,
            bands: ReadingBands::of(&reading, &self.config),
        });
        self.reevaluate(store, announcer, sink);
    }

    /// The threshold config changed.
    pub fn on_config(
        &mut self,
        config: ControlConfig,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        if config == self.config {
            return;
        }
        self.config = config;
        self.mark_config_dirty();
        sink.emit(&AppEvent::ConfigUpdated(config));
        info!(
            "Thresholds updated: T={:.1}°C RH={:.0}%",
            config.temperature_threshold, config.humidity_threshold
        );
        self.reevaluate(store, announcer, sink);
    }

    /// The auto/manual switch changed.
    pub fn on_mode(
        &mut self,
        mode: Mode,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        sink.emit(&AppEvent::ModeChanged(mode));
        info!("Mode switched to {}", mode);
        self.reevaluate(store, announcer, sink);
    }

    /// A device state observed in the database.
    ///
    /// Echoes of our own writes are consumed in write order and ignored,
    /// as is anything matching the known state.  Anything else came from
    /// another writer: record it, announce it, and re-run the rules so auto
    /// mode stays consistent.
    pub fn on_device_state(
        &mut self,
        device: Device,
        on: bool,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        if self.take_echo(device, on) {
            debug!("Echo of own write {} = {}", device, on);
            return;
        }
        if self.devices.get(device) == on {
            return;
        }
        self.devices.set(device, on);
        announcer.announce(&announce::device_changed(self.locale, device, on));
        sink.emit(&AppEvent::DeviceChanged {
            device,
            on,
            source: ChangeSource::Remote,
        });
        self.reevaluate(store, announcer, sink);
    }

    /// Turner settings observed in the database.
    pub fn on_turner(&mut self, turner: TurnerSettings, sink: &mut impl EventSink) {
        if turner == self.turner {
            return;
        }
        self.turner = turner;
        sink.emit(&AppEvent::TurnerUpdated(turner));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a user command from the dashboard.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        db: &mut impl RealtimeStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ToggleDevice(device) => {
                let on = !self.devices.get(device);
                self.set_device_by_user(device, on, db, announcer, sink);
            }
            AppCommand::SetDevice { device, on } => {
                self.set_device_by_user(device, on, db, announcer, sink);
            }
            AppCommand::SetMode(mode) => self.write_mode(mode, db, announcer, sink),
            AppCommand::ToggleMode => {
                let mode = self.mode.toggled();
                self.write_mode(mode, db, announcer, sink);
            }
            AppCommand::UpdateConfig(config) => {
                if let Err(reason) = config.validate() {
                    warn!("Config update rejected: {}", reason);
                    sink.emit(&AppEvent::CommandRejected(reason));
                    return;
                }
                match db.save_config(&config) {
                    Ok(()) => self.on_config(config, db, announcer, sink),
                    Err(e) => {
                        warn!("Config write failed: {}", e);
                        sink.emit(&AppEvent::WriteFailed {
                            target: WriteTarget::Config,
                            error: e,
                        });
                    }
                }
            }
            AppCommand::SetTurnerEnabled(enabled) => {
                match db.set_turner_enabled(enabled) {
                    Ok(()) => {
                        let turner = TurnerSettings {
                            enabled,
                            ..self.turner
                        };
                        self.on_turner(turner, sink);
                    }
                    Err(e) => self.turner_write_failed(e, sink),
                }
            }
            AppCommand::SetTurnerPeriodMinutes(minutes) => {
                let Some(term) = minutes_to_term_ms(minutes) else {
                    warn!("Turner period rejected: {} min", minutes);
                    sink.emit(&AppEvent::CommandRejected(
                        "turner period must be a non-negative number of minutes",
                    ));
                    return;
                };
                match db.set_turner_term_ms(term) {
                    Ok(()) => {
                        let turner = TurnerSettings {
                            term,
                            ..self.turner
                        };
                        self.on_turner(turner, sink);
                    }
                    Err(e) => self.turner_write_failed(e, sink),
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> ControlConfig {
        self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Last known (possibly optimistic) actuator states.
    pub fn devices(&self) -> ActuatorStates {
        self.devices
    }

    pub fn last_reading(&self) -> Option<SensorReading> {
        self.last_reading
    }

    pub fn turner(&self) -> TurnerSettings {
        self.turner
    }

    /// Deviation bands of the last reading against the current thresholds.
    pub fn bands(&self) -> Option<ReadingBands> {
        self.last_reading
            .map(|r| ReadingBands::of(&r, &self.config))
    }

    /// Auto-mode evaluations run since startup.
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations
    }

    // ── Internal ──────────────────────────────────────────────

    /// Run the rules against the last reading and apply any transitions.
    fn reevaluate(
        &mut self,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        if !self.mode.is_auto() {
            return;
        }
        let Some(reading) = self.last_reading else {
            debug!("No reading yet, skipping evaluation");
            return;
        };
        self.evaluations += 1;
        let eval = evaluate(&reading, &self.config, &self.devices, self.mode);
        for t in &eval.transitions {
            self.apply(t.device, t.on, ChangeSource::Auto, store, announcer, sink);
        }
    }

    /// Manual device command.  Refused while auto mode has a reading to
    /// act on, since the rules would immediately override it.
    fn set_device_by_user(
        &mut self,
        device: Device,
        on: bool,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        if self.mode.is_auto() && self.last_reading.is_some() {
            warn!("Ignoring manual {} command in auto mode", device);
            sink.emit(&AppEvent::CommandRejected(
                "devices are under automatic control",
            ));
            return;
        }
        if self.devices.get(device) == on {
            return;
        }
        self.apply(device, on, ChangeSource::User, store, announcer, sink);
    }

    /// Record, persist and announce one device transition.
    fn apply(
        &mut self,
        device: Device,
        on: bool,
        source: ChangeSource,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        self.devices.set(device, on);
        match store.set_device(device, on) {
            Ok(()) => self.expect_echo(device, on),
            Err(e) => {
                warn!("Write of {} = {} failed: {}", device, on, e);
                sink.emit(&AppEvent::WriteFailed {
                    target: WriteTarget::Device(device),
                    error: e,
                });
            }
        }
        announcer.announce(&announce::device_changed(self.locale, device, on));
        sink.emit(&AppEvent::DeviceChanged { device, on, source });
    }

    fn expect_echo(&mut self, device: Device, on: bool) {
        let pending = &mut self.pending_echoes[device as usize];
        if pending.is_full() {
            let _ = pending.pop_front();
        }
        let _ = pending.push_back(on);
    }

    /// Consume `on` if it echoes one of our pending writes.  Older entries
    /// ahead of it are discarded: a lagging subscription dropped them.
    fn take_echo(&mut self, device: Device, on: bool) -> bool {
        let pending = &mut self.pending_echoes[device as usize];
        if !pending.iter().any(|&v| v == on) {
            return false;
        }
        while let Some(v) = pending.pop_front() {
            if v == on {
                return true;
            }
        }
        false
    }

    fn write_mode(
        &mut self,
        mode: Mode,
        db: &mut impl RealtimeStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) {
        match db.set_mode(mode) {
            Ok(()) => self.on_mode(mode, db, announcer, sink),
            Err(e) => {
                warn!("Mode write failed: {}", e);
                sink.emit(&AppEvent::WriteFailed {
                    target: WriteTarget::Mode,
                    error: e,
                });
            }
        }
    }

    fn turner_write_failed(&self, error: super::ports::StoreError, sink: &mut impl EventSink) {
        warn!("Turner write failed: {}", error);
        sink.emit(&AppEvent::WriteFailed {
            target: WriteTarget::Turner,
            error,
        });
    }

    // ── Config dirty-flag management ──────────────────────────

    /// Mark the config as changed since the last local save.
    pub fn mark_config_dirty(&mut self) {
        self.config_dirty = true;
    }

    /// Persist the thresholds to the local cache if they changed.
    /// Returns `true` if the config was saved.
    pub fn save_config_if_dirty(&mut self, cache: &(impl ConfigPort + ?Sized)) -> bool {
        if !self.config_dirty {
            return false;
        }
        match cache.save(&self.config) {
            Ok(()) => {
                self.config_dirty = false;
                info!("Config cached locally");
                true
            }
            Err(e) => {
                warn!("Config cache save failed: {}", e);
                false
            }
        }
    }

    /// Whether the config has unsaved changes.
    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }
}
