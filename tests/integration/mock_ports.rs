//! Mock port adapters for integration tests.
//!
//! Records every store write so tests can assert on the full write history
//! without a database.  Failures can be injected per call family.

use incubator::app::events::AppEvent;
use incubator::app::ports::{
    ActuatorStore, ControlConfigStore, EventSink, ModeStore, StoreError, TurnerStore,
};
use incubator::config::{ControlConfig, TurnerSettings};
use incubator::model::{ActuatorStates, Device, Mode};

// ── Store write record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Device(Device, bool),
    Mode(Mode),
    Config(ControlConfig),
    TurnerEnabled(bool),
    TurnerTerm(u64),
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub calls: Vec<StoreCall>,
    pub devices: ActuatorStates,
    pub mode: Mode,
    pub config: Option<ControlConfig>,
    pub turner: TurnerSettings,
    /// Every write fails with this error when set.
    pub fail_with: Option<StoreError>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    pub fn device_writes(&self) -> Vec<(Device, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                StoreCall::Device(d, on) => Some((*d, *on)),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: StoreCall) -> Result<(), StoreError> {
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl ActuatorStore for MockStore {
    fn get_device(&self, device: Device) -> Result<bool, StoreError> {
        Ok(self.devices.get(device))
    }

    fn set_device(&mut self, device: Device, on: bool) -> Result<(), StoreError> {
        self.record(StoreCall::Device(device, on))?;
        self.devices.set(device, on);
        Ok(())
    }
}

impl ModeStore for MockStore {
    fn get_mode(&self) -> Result<Mode, StoreError> {
        Ok(self.mode)
    }

    fn set_mode(&mut self, mode: Mode) -> Result<(), StoreError> {
        self.record(StoreCall::Mode(mode))?;
        self.mode = mode;
        Ok(())
    }
}

impl ControlConfigStore for MockStore {
    fn load_config(&self) -> Result<Option<ControlConfig>, StoreError> {
        Ok(self.config)
    }

    fn save_config(&mut self, config: &ControlConfig) -> Result<(), StoreError> {
        self.record(StoreCall::Config(*config))?;
        self.config = Some(*config);
        Ok(())
    }
}

impl TurnerStore for MockStore {
    fn get_turner(&self) -> Result<TurnerSettings, StoreError> {
        Ok(self.turner)
    }

    fn set_turner_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.record(StoreCall::TurnerEnabled(enabled))?;
        self.turner.enabled = enabled;
        Ok(())
    }

    fn set_turner_term_ms(&mut self, term_ms: u64) -> Result<(), StoreError> {
        self.record(StoreCall::TurnerTerm(term_ms))?;
        self.turner.term = term_ms;
        Ok(())
    }
}

// ── EventLog ──────────────────────────────────────────────────

#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejections(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandRejected(_)))
            .count()
    }

    pub fn write_failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::WriteFailed { .. }))
            .count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
