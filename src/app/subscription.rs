//! Snapshot subscriptions.
//!
//! Each subscription is a bounded `embassy-sync` channel shared between the
//! publishing adapter and the consuming feed.  Everything runs on one
//! thread, so the channel uses [`NoopRawMutex`].
//!
//! ```text
//! ┌──────────────┐  Value  ┌──────────────┐
//! │  Publisher   │───────▶│ Subscription │
//! │  (adapter)   │         │  (feed)      │
//! └──────────────┘         └──────────────┘
//! ```
//!
//! Snapshots supersede each other, so when a subscriber falls behind and
//! its channel is full, the oldest pending snapshot is discarded.

use core::cell::Cell;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::debug;
use serde_json::Value;

/// Pending snapshots per subscription.
pub const SUBSCRIPTION_DEPTH: usize = 8;

struct Shared {
    path: String,
    queue: Channel<NoopRawMutex, Value, SUBSCRIPTION_DEPTH>,
    open: Cell<bool>,
}

/// Create a connected publisher/subscription pair for `path`.
pub fn channel(path: &str) -> (Publisher, Subscription) {
    let shared = Rc::new(Shared {
        path: path.to_string(),
        queue: Channel::new(),
        open: Cell::new(true),
    });
    (
        Publisher {
            shared: Rc::clone(&shared),
        },
        Subscription { shared },
    )
}

/// Consumer half.  Dropping it unsubscribes.
pub struct Subscription {
    shared: Rc<Shared>,
}

impl Subscription {
    pub fn path(&self) -> &str {
        &self.shared.path
    }

    /// Next pending snapshot, if any.
    pub fn try_next(&mut self) -> Option<Value> {
        self.shared.queue.try_receive().ok()
    }

    /// Wait for the next snapshot.
    pub async fn next(&mut self) -> Value {
        self.shared.queue.receive().await
    }

    /// Stop delivery.  Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shared.open.set(false);
    }
}

/// Producer half, held by the adapter.
pub struct Publisher {
    shared: Rc<Shared>,
}

impl Publisher {
    pub fn path(&self) -> &str {
        &self.shared.path
    }

    /// False once the subscription has been dropped.
    pub fn is_open(&self) -> bool {
        self.shared.open.get()
    }

    /// Deliver a snapshot.  Returns `false` if nobody is listening.
    pub fn publish(&self, value: Value) -> bool {
        if !self.is_open() {
            return false;
        }
        if let Err(TrySendError::Full(value)) = self.shared.queue.try_send(value) {
            let _ = self.shared.queue.try_receive();
            debug!("subscription '{}' lagging, dropped oldest snapshot", self.shared.path);
            let _ = self.shared.queue.try_send(value);
        }
        true
    }
}
