//! Common error types for the Aerogarden client.
//!
//! This module provides validation errors shared across crates.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Validation errors for core types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An invalid identifier was provided.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] crate::ids::IdError),

    /// A brightness above 100% was requested.
    #[error("brightness {0} is out of range 0..=100")]
    BrightnessOutOfRange(u8),

    /// The device reported a `lightStat` other than 0 or 1.
    #[error("invalid lightStat value: {0}")]
    InvalidLightStat(u8),
}
