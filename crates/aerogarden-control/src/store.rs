//! Cached device state.
//!
//! The store is owned by the device actor, so a read followed by a write is
//! never interleaved with another command. Every change is published on a
//! `watch` channel for observers.

use aerogarden_core::DeviceState;
use tokio::sync::watch;

/// The single in-process view of one device's light.
#[derive(Debug)]
pub struct DeviceStateStore {
    tx: watch::Sender<DeviceState>,
}

impl DeviceStateStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: DeviceState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current cached state.
    #[must_use]
    pub fn read(&self) -> DeviceState {
        *self.tx.borrow()
    }

    /// Replace the cached state, notifying subscribers if it changed.
    pub fn write(&self, state: DeviceState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DeviceState> {
        self.tx.subscribe()
    }
}

impl Default for DeviceStateStore {
    fn default() -> Self {
        Self::new(DeviceState::default())
    }
}
