//! In-memory realtime database adapter.
//!
//! Implements [`SnapshotSource`] and every realtime store port over a
//! single JSON tree, the same shape the hosted database keeps:
//!
//! ```text
//! {
//!   "Sensor":   { "temperature": 37.2, "humidity": 58, "lux": 40 },
//!   "autoMode": { "config": { … }, "isAutoMode": true },
//!   "devices":  { "LED": { "state": false }, "FAN": { … }, "Mist": { … } },
//!   "servo":    { "enabled": true, "term": 7200000 }
//! }
//! ```
//!
//! Writing `null` deletes a node and prunes empty parents.  A write
//! notifies every subscription whose path overlaps the written path, but
//! only when the value at the subscribed path actually changed.  New
//! subscriptions receive the current value (possibly `null`) immediately.
//!
//! The adapter can be taken offline or have paths write-protected, which
//! surfaces as [`StoreError::Unavailable`] / [`StoreError::PermissionDenied`].

use log::{debug, info, warn};
use serde_json::{Map, Value, json};

use crate::app::ports::{
    ActuatorStore, ControlConfigStore, ModeStore, SnapshotSource, StoreError, TurnerStore,
};
use crate::app::subscription::{self, Publisher, Subscription};
use crate::config::{ControlConfig, TurnerSettings};
use crate::model::{Device, Mode, SensorReading};
use crate::wire::{self, CONFIG_PATH, MODE_PATH, SENSOR_PATH, TURNER_ENABLED_PATH, TURNER_PATH, TURNER_TERM_PATH};

pub struct MemoryRealtimeDb {
    root: Value,
    online: bool,
    protected: Vec<String>,
    subscribers: Vec<Publisher>,
}

impl MemoryRealtimeDb {
    pub fn new() -> Self {
        info!("MemoryRealtimeDb: simulation backend");
        Self {
            root: Value::Object(Map::new()),
            online: true,
            protected: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Start from an existing tree (e.g. an exported database dump).
    pub fn with_root(root: Value) -> Self {
        let mut db = Self::new();
        if root.is_object() {
            db.root = root;
        } else {
            warn!("MemoryRealtimeDb: root must be an object, starting empty");
        }
        db
    }

    /// Simulate losing (or regaining) the connection.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
        info!("MemoryRealtimeDb: {}", if online { "online" } else { "offline" });
    }

    /// Reject writes at or below `path`, as a security rule would.
    pub fn protect(&mut self, path: &str) {
        self.protected.push(normalize(path));
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&mut self) -> usize {
        self.subscribers.retain(Publisher::is_open);
        self.subscribers.len()
    }

    /// Value stored at `path`, `null` when absent.
    pub fn get(&self, path: &str) -> Value {
        read_at(&self.root, path).cloned().unwrap_or(Value::Null)
    }

    /// Replace the value at `path`, notifying overlapping subscriptions.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        if !self.online {
            return Err(StoreError::Unavailable);
        }
        let path = normalize(path);
        if self.protected.iter().any(|p| is_within(&path, p)) {
            warn!("MemoryRealtimeDb: write to '{}' denied", path);
            return Err(StoreError::PermissionDenied);
        }

        self.subscribers.retain(Publisher::is_open);
        let before: Vec<Option<Value>> = self
            .subscribers
            .iter()
            .map(|s| overlaps(s.path(), &path).then(|| self.get(s.path())))
            .collect();

        let segs: Vec<&str> = wire::segments(&path).collect();
        write_at(&mut self.root, &segs, value);
        if !self.root.is_object() {
            self.root = Value::Object(Map::new());
        }

        for (sub, old) in self.subscribers.iter().zip(before) {
            let Some(old) = old else { continue };
            let new = read_at(&self.root, sub.path()).cloned().unwrap_or(Value::Null);
            if new != old {
                sub.publish(new);
            }
        }
        debug!("MemoryRealtimeDb: set '{}'", path);
        Ok(())
    }

    /// Write a reading to the `Sensor` node, as the incubator board does.
    pub fn publish_reading(&mut self, reading: &SensorReading) -> Result<(), StoreError> {
        self.set(SENSOR_PATH, wire::encode_reading(reading))
    }

    fn read_checked(&self, path: &str) -> Result<Value, StoreError> {
        if !self.online {
            return Err(StoreError::Unavailable);
        }
        Ok(self.get(path))
    }
}

impl Default for MemoryRealtimeDb {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tree helpers ──────────────────────────────────────────────

fn normalize(path: &str) -> String {
    wire::segments(path).collect::<Vec<_>>().join("/")
}

/// `path` equals `ancestor` or lies below it.
fn is_within(path: &str, ancestor: &str) -> bool {
    let mut p = wire::segments(path);
    wire::segments(ancestor).all(|a| p.next() == Some(a))
}

fn overlaps(a: &str, b: &str) -> bool {
    is_within(a, b) || is_within(b, a)
}

fn read_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    wire::segments(path).try_fold(root, |node, seg| node.get(seg))
}

fn write_at(node: &mut Value, segs: &[&str], value: Value) {
    let Some((head, rest)) = segs.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else { return };
    let child = map.entry(head.to_string()).or_insert(Value::Null);
    write_at(child, rest, value);
    if child.is_null() || child.as_object().is_some_and(Map::is_empty) {
        map.remove(*head);
    }
}

// ── Ports ─────────────────────────────────────────────────────

impl SnapshotSource for MemoryRealtimeDb {
    fn subscribe(&mut self, path: &str) -> Subscription {
        let path = normalize(path);
        let (publisher, subscription) = subscription::channel(&path);
        publisher.publish(self.get(&path));
        self.subscribers.push(publisher);
        debug!("MemoryRealtimeDb: subscribed to '{}'", path);
        subscription
    }
}

impl ActuatorStore for MemoryRealtimeDb {
    fn get_device(&self, device: Device) -> Result<bool, StoreError> {
        match self.read_checked(&wire::device_state_path(device))? {
            Value::Null => Ok(false),
            v => wire::decode_device_state(&v).map_err(|_| StoreError::Malformed),
        }
    }

    fn set_device(&mut self, device: Device, on: bool) -> Result<(), StoreError> {
        self.set(&wire::device_state_path(device), Value::Bool(on))
    }
}

impl ModeStore for MemoryRealtimeDb {
    fn get_mode(&self) -> Result<Mode, StoreError> {
        match self.read_checked(MODE_PATH)? {
            Value::Null => Ok(Mode::default()),
            v => wire::decode_mode(&v).map_err(|_| StoreError::Malformed),
        }
    }

    fn set_mode(&mut self, mode: Mode) -> Result<(), StoreError> {
        self.set(MODE_PATH, wire::encode_mode(mode))
    }
}

impl ControlConfigStore for MemoryRealtimeDb {
    fn load_config(&self) -> Result<Option<ControlConfig>, StoreError> {
        match self.read_checked(CONFIG_PATH)? {
            Value::Null => Ok(None),
            v => wire::decode_config(&v)
                .map(Some)
                .map_err(|_| StoreError::Malformed),
        }
    }

    fn save_config(&mut self, config: &ControlConfig) -> Result<(), StoreError> {
        self.set(CONFIG_PATH, wire::encode_config(config))
    }
}

impl TurnerStore for MemoryRealtimeDb {
    fn get_turner(&self) -> Result<TurnerSettings, StoreError> {
        match self.read_checked(TURNER_PATH)? {
            Value::Null => Ok(TurnerSettings::default()),
            v => wire::decode_turner(&v).map_err(|_| StoreError::Malformed),
        }
    }

    fn set_turner_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.set(TURNER_ENABLED_PATH, Value::Bool(enabled))
    }

    fn set_turner_term_ms(&mut self, term_ms: u64) -> Result<(), StoreError> {
        self.set(TURNER_TERM_PATH, json!(term_ms))
    }
}
