//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements          | Connects to                 |
//! |----------------|---------------------|-----------------------------|
//! | `realtime_db`  | SnapshotSource      | In-memory JSON tree         |
//! |                | ActuatorStore       |                             |
//! |                | ModeStore           |                             |
//! |                | ControlConfigStore  |                             |
//! |                | TurnerStore         |                             |
//! | `hatch_store`  | HatchCycleStore     | In-memory document list     |
//! | `config_cache` | ConfigPort          | Memory / postcard file      |
//! | `speech`       | Announcer           | Log output / buffer         |
//! | `log_sink`     | EventSink           | Log output                  |

pub mod config_cache;
pub mod hatch_store;
pub mod log_sink;
pub mod realtime_db;
pub mod speech;
