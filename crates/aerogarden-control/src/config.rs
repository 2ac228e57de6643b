//! Controller configuration.

use std::time::Duration;

use aerogarden_core::{DeviceId, UserId};
use serde::Deserialize;

use crate::error::{ControlError, Result};

/// Configuration for one device actor.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    /// The garden's device identifier.
    pub device_id: DeviceId,

    /// The account's user identifier.
    pub user_id: UserId,

    /// How long a set-power request waits before it is acknowledged, in milliseconds.
    #[serde(default = "ControlConfig::default_ack_window")]
    pub ack_window_ms: u64,

    /// Delay before the second toggle of a two-step turn-off, in milliseconds.
    #[serde(default = "ControlConfig::default_follow_up_delay")]
    pub follow_up_step_delay_ms: u64,

    /// Capacity of the actor's command mailbox.
    #[serde(default = "ControlConfig::default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

impl ControlConfig {
    const fn default_ack_window() -> u64 {
        30_000
    }

    const fn default_follow_up_delay() -> u64 {
        300
    }

    const fn default_mailbox_capacity() -> usize {
        32
    }

    /// Create a configuration with default timings.
    #[must_use]
    pub const fn new(device_id: DeviceId, user_id: UserId) -> Self {
        Self {
            device_id,
            user_id,
            ack_window_ms: Self::default_ack_window(),
            follow_up_step_delay_ms: Self::default_follow_up_delay(),
            mailbox_capacity: Self::default_mailbox_capacity(),
        }
    }

    /// Get the acknowledgment window as a `Duration`.
    #[must_use]
    pub const fn ack_window(&self) -> Duration {
        Duration::from_millis(self.ack_window_ms)
    }

    /// Get the follow-up step delay as a `Duration`.
    #[must_use]
    pub const fn follow_up_step_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_step_delay_ms)
    }

    /// Check that the configuration can drive an actor.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::InvalidConfig` if the mailbox capacity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.mailbox_capacity == 0 {
            return Err(ControlError::InvalidConfig(
                "mailbox_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
