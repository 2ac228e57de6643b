//! Core types for the Aerogarden light client.
//!
//! This crate provides the foundational types shared by the remote gateway
//! and the device controller:
//!
//! - **Identifiers**: `DeviceId` and `UserId`, opaque strings checked for presence
//! - **State**: `DeviceState`, `Brightness` and the wire-level `LightStat`
//! - **Accessory information**: static fields shown by the host
//!
//! # Example
//!
//! ```
//! use aerogarden_core::{Brightness, BrightnessLevel, DeviceId, DeviceState};
//!
//! let device_id = DeviceId::new("AA:BB:CC:DD:EE:FF").unwrap();
//! let state = DeviceState::default();
//!
//! assert!(!state.on);
//! assert_eq!(state.brightness.level(), BrightnessLevel::Full);
//! assert_eq!(Brightness::new(50).unwrap(), Brightness::HALF);
//! # let _ = device_id;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod info;
pub mod state;

pub use error::{CoreError, Result};
pub use ids::{DeviceId, IdError, UserId};
pub use info::AccessoryInfo;
pub use state::{Brightness, BrightnessLevel, DeviceState, LightStat};
