//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (realtime database, speech engine, event log, local
//! cache) implement these traits.  The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the domain core never touches a backend
//! directly.
//!
//! Method names carry their subject (`set_device`, `set_mode`, …) because a
//! single database adapter usually implements several of these ports.

use crate::config::{ControlConfig, TurnerSettings};
use crate::hatch::{HatchCycle, HatchStatus, NewHatchCycle};
use crate::model::{Device, Mode};

use super::subscription::Subscription;

// ───────────────────────────────────────────────────────────────
// Snapshot source (driven adapter: database → domain)
// ───────────────────────────────────────────────────────────────

/// Path-keyed change notifications.
///
/// A subscription is lazy and non-restartable: it yields the node's value
/// at subscribe time and then once per change, until it is dropped.
pub trait SnapshotSource {
    fn subscribe(&mut self, path: &str) -> Subscription;
}

// ───────────────────────────────────────────────────────────────
// Realtime stores (driven adapters: domain ↔ database)
// ───────────────────────────────────────────────────────────────

/// Per-device on/off state (`devices/<key>/state`).
pub trait ActuatorStore {
    /// Last stored state.  A device that was never written reads as off.
    fn get_device(&self, device: Device) -> Result<bool, StoreError>;

    fn set_device(&mut self, device: Device, on: bool) -> Result<(), StoreError>;
}

/// Auto/manual switch (`autoMode/isAutoMode`).
pub trait ModeStore {
    fn get_mode(&self) -> Result<Mode, StoreError>;

    fn set_mode(&mut self, mode: Mode) -> Result<(), StoreError>;
}

/// Shared threshold config (`autoMode/config`).
pub trait ControlConfigStore {
    /// `Ok(None)` when no config has been written yet.
    fn load_config(&self) -> Result<Option<ControlConfig>, StoreError>;

    fn save_config(&mut self, config: &ControlConfig) -> Result<(), StoreError>;
}

/// Egg-turner servo node (`servo`).
pub trait TurnerStore {
    fn get_turner(&self) -> Result<TurnerSettings, StoreError>;

    fn set_turner_enabled(&mut self, enabled: bool) -> Result<(), StoreError>;

    fn set_turner_term_ms(&mut self, term_ms: u64) -> Result<(), StoreError>;
}

/// Everything the service writes to on behalf of a user command.
pub trait RealtimeStore: ActuatorStore + ModeStore + ControlConfigStore + TurnerStore {}

impl<T: ActuatorStore + ModeStore + ControlConfigStore + TurnerStore> RealtimeStore for T {}

// ───────────────────────────────────────────────────────────────
// Document store (driven adapter: domain ↔ hatch-cycle records)
// ───────────────────────────────────────────────────────────────

pub trait HatchCycleStore {
    /// Persist a new cycle and return it with its assigned id.
    fn create(&mut self, cycle: NewHatchCycle) -> Result<HatchCycle, StoreError>;

    /// The cycle whose status is `doing`, if any.
    fn active(&self) -> Result<Option<HatchCycle>, StoreError>;

    fn set_status(&mut self, id: &str, status: HatchStatus) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Announcer (driven adapter: domain → speech output)
// ───────────────────────────────────────────────────────────────

/// Best-effort spoken feedback.  Implementations must not block and must
/// swallow (and log) their own failures.
pub trait Announcer {
    fn announce(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ local config cache)
// ───────────────────────────────────────────────────────────────

/// Keeps the last known thresholds on the client so the service can start
/// before the first database snapshot arrives.
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`ConfigError::ValidationFailed`] rather than clamp them.
pub trait ConfigPort {
    /// Returns [`ControlConfig::default()`] if nothing is cached.
    fn load(&self) -> Result<ControlConfig, ConfigError>;

    fn save(&self, config: &ControlConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from the database-facing ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Backend unreachable (offline, connection dropped).
    Unavailable,
    /// Security rules rejected the operation.
    PermissionDenied,
    /// Referenced record does not exist.
    NotFound,
    /// Stored value has an unexpected shape.
    Malformed,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Cached blob failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the cache backend.
    IoError,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "store unavailable"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::NotFound => write!(f, "record not found"),
            Self::Malformed => write!(f, "stored value malformed"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for StoreError {}

impl std::error::Error for ConfigError {}
