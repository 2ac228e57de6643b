//! Light state types.
//!
//! The host models the grow light as a power switch plus a 0-100 brightness.
//! The device itself only knows a binary `lightStat`, so brightness is tracked
//! locally and only ever moves between three levels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A brightness percentage in `0..=100`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Brightness(u8);

impl Brightness {
    /// Light fully off.
    pub const OFF: Self = Self(0);
    /// The intermediate level reached by a single step down from full.
    pub const HALF: Self = Self(50);
    /// Light fully on.
    pub const FULL: Self = Self(100);

    /// Create a brightness value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BrightnessOutOfRange` if `percent` exceeds 100.
    pub const fn new(percent: u8) -> Result<Self, CoreError> {
        if percent > 100 {
            return Err(CoreError::BrightnessOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// Return the percentage.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Classify this value into one of the three stepper levels.
    #[must_use]
    pub const fn level(self) -> BrightnessLevel {
        match self.0 {
            0 => BrightnessLevel::Off,
            100 => BrightnessLevel::Full,
            _ => BrightnessLevel::Partial,
        }
    }
}

impl fmt::Debug for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u8 {
    fn from(value: Brightness) -> Self {
        value.0
    }
}

/// The three brightness bands the stepper distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrightnessLevel {
    /// Exactly 0%.
    Off,
    /// Strictly between 0% and 100%.
    Partial,
    /// Exactly 100%.
    Full,
}

/// The binary light flag understood by the remote device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LightStat {
    /// `lightStat = 0`.
    Off,
    /// `lightStat = 1`.
    On,
}

impl LightStat {
    /// Map a power flag onto the wire value.
    #[must_use]
    pub const fn from_on(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }

    /// The integer sent over the wire.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl TryFrom<u8> for LightStat {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(CoreError::InvalidLightStat(other)),
        }
    }
}

impl From<LightStat> for u8 {
    fn from(value: LightStat) -> Self {
        value.as_u8()
    }
}

/// The locally cached view of the light.
///
/// `on` mirrors what the host last asked for or what the device last reported;
/// `brightness` is the stepper's position. A zero brightness means the light
/// is dark regardless of `on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Power switch as seen by the host.
    pub on: bool,
    /// Position of the brightness stepper.
    pub brightness: Brightness,
}

impl DeviceState {
    /// Create a state from its parts.
    #[must_use]
    pub const fn new(on: bool, brightness: Brightness) -> Self {
        Self { on, brightness }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            on: false,
            brightness: Brightness::FULL,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = if self.on { "on" } else { "off" };
        write!(f, "{power} @ {}", self.brightness)
    }
}
