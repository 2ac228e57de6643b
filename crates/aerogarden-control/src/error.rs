//! Error types for the device controller.
//!
//! Remote failures never appear here: toggles are logged and swallowed, and
//! queries fall back to cached state. What remains is configuration and the
//! actor having gone away.

use thiserror::Error;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Errors that can occur in controller operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The device actor has shut down and no longer accepts commands.
    #[error("device actor is not running")]
    ActorUnavailable,

    /// The controller configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why an acknowledgment resolved without firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AckError {
    /// A newer set-power request replaced this one, or the actor was shut
    /// down before the window elapsed.
    #[error("acknowledgment cancelled before the window elapsed")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_message() {
        let err = ControlError::InvalidConfig("mailbox_capacity must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: mailbox_capacity must be at least 1"
        );
    }

    #[test]
    fn ack_error_message() {
        assert_eq!(
            AckError::Cancelled.to_string(),
            "acknowledgment cancelled before the window elapsed"
        );
    }
}
