//! Snapshot feed — subscriptions in, service calls out.
//!
//! Owns one [`Subscription`] per database node the service cares about,
//! decodes what arrives, and dispatches it to the [`ControlService`].
//! Undecodable snapshots are "no update": logged, reported, and dropped.
//!
//! [`pump`](SnapshotFeed::pump) drains in rounds until nothing is pending,
//! so the echoes of the service's own writes settle in the same call.

use log::{debug, warn};
use serde_json::Value;

use crate::error::DecodeError;
use crate::model::Device;
use crate::wire::{self, CONFIG_PATH, MODE_PATH, SENSOR_PATH, TURNER_PATH};

use super::events::AppEvent;
use super::ports::{ActuatorStore, Announcer, EventSink, SnapshotSource};
use super::service::ControlService;
use super::subscription::Subscription;

/// Upper bound on drain rounds per pump.  A round handles at most one
/// reading, so this covers a full sensor queue plus the echo rounds that
/// follow it.  Whatever is left stays queued for the next pump.
const MAX_ROUNDS: usize = 64;

pub struct SnapshotFeed {
    sensor: Subscription,
    config: Subscription,
    mode: Subscription,
    devices: [(Device, Subscription); 3],
    turner: Subscription,
}

impl SnapshotFeed {
    /// Subscribe to every node the control service consumes.
    pub fn subscribe(source: &mut impl SnapshotSource) -> Self {
        Self {
            sensor: source.subscribe(SENSOR_PATH),
            config: source.subscribe(CONFIG_PATH),
            mode: source.subscribe(MODE_PATH),
            devices: Device::ALL.map(|d| (d, source.subscribe(&wire::device_state_path(d)))),
            turner: source.subscribe(TURNER_PATH),
        }
    }

    /// Dispatch every pending snapshot.  Returns how many were handled.
    pub fn pump(
        &mut self,
        service: &mut ControlService,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut total = 0;
        for _ in 0..MAX_ROUNDS {
            let handled = self.drain_round(service, store, announcer, sink);
            if handled == 0 {
                break;
            }
            total += handled;
        }
        total
    }

    /// One pass over every subscription.  Config and mode go first so a
    /// reading in the same round is judged against the newest settings.
    /// Settings are last-writer-wins: only the newest usable snapshot of
    /// each is dispatched.
    ///
    /// At most one reading is dispatched per round: the device echoes of
    /// its writes must be consumed before the next reading, or a stale echo
    /// would look like a change made by another writer.
    fn drain_round(
        &mut self,
        service: &mut ControlService,
        store: &mut impl ActuatorStore,
        announcer: &mut impl Announcer,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut handled = 0;

        if let Some(config) = newest(&mut self.config, CONFIG_PATH, wire::decode_config, sink, &mut handled) {
            service.on_config(config, store, announcer, sink);
        }

        if let Some(mode) = newest(&mut self.mode, MODE_PATH, wire::decode_mode, sink, &mut handled) {
            service.on_mode(mode, store, announcer, sink);
        }

        for (device, sub) in &mut self.devices {
            while let Some(v) = sub.try_next() {
                handled += 1;
                if let Some(on) = accept(DEVICE_STATE_LABEL, wire::decode_device_state(&v), sink) {
                    service.on_device_state(*device, on, store, announcer, sink);
                }
            }
        }

        if let Some(turner) = newest(&mut self.turner, TURNER_PATH, wire::decode_turner, sink, &mut handled) {
            service.on_turner(turner, sink);
        }

        if let Some(v) = self.sensor.try_next() {
            handled += 1;
            if let Some(reading) = accept(SENSOR_PATH, wire::decode_reading(&v), sink) {
                service.on_reading(reading, store, announcer, sink);
            }
        }

        handled
    }
}

const DEVICE_STATE_LABEL: &str = "devices/*/state";

/// Drain `sub`, keeping the last snapshot that decodes.
fn newest<T>(
    sub: &mut Subscription,
    path: &'static str,
    decode: fn(&Value) -> Result<T, DecodeError>,
    sink: &mut impl EventSink,
    handled: &mut usize,
) -> Option<T> {
    let mut newest = None;
    while let Some(v) = sub.try_next() {
        *handled += 1;
        if let Some(value) = accept(path, decode(&v), sink) {
            newest = Some(value);
        }
    }
    newest
}

/// Unwrap a decoded snapshot, reporting anything unusable.
fn accept<T>(
    path: &'static str,
    decoded: Result<T, DecodeError>,
    sink: &mut impl EventSink,
) -> Option<T> {
    match decoded {
        Ok(value) => Some(value),
        Err(DecodeError::Missing) => {
            debug!("{}: node empty, keeping previous state", path);
            None
        }
        Err(error) => {
            warn!("{}: ignoring snapshot ({})", path, error);
            sink.emit(&AppEvent::SnapshotRejected { path, error });
            None
        }
    }
}
