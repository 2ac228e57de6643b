//! Device controller for the Aerogarden grow light.
//!
//! The host models the light as a power switch plus a brightness, while the
//! device only accepts a binary toggle. This crate reconciles the two:
//!
//! - a three-level **stepper** maps power requests onto toggles
//! - an **acknowledgment window** answers set-power requests after a fixed
//!   delay so the host never waits on the network
//! - a **reconciler** corrects cached brightness from the device's reported state
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Host (HomeKit bridge)                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ DeviceHandle
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        DeviceActor                          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  AckTimer   │ │  Stepper    │ │    Reconciler       │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! │                   DeviceStateStore                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                     ┌─────────────────┐
//!                     │  RemoteGateway  │
//!                     └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use aerogarden_control::{ControlConfig, DeviceActor};
//! use aerogarden_core::{DeviceId, UserId};
//! use aerogarden_remote::{HttpRemoteGateway, RemoteConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ControlConfig::new(DeviceId::new("AA:BB:CC:DD:EE:FF")?, UserId::new("123456")?);
//! let gateway = Arc::new(HttpRemoteGateway::new(RemoteConfig::default()));
//! let light = DeviceActor::spawn(config, gateway)?;
//!
//! let ack = light.set_power(true).await?;
//! println!("light is on: {}", light.get_power().await?);
//! ack.await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Driving policy
//!
//! | requested | cached brightness | toggles sent          |
//! |-----------|-------------------|-----------------------|
//! | off       | 100%              | two, 300 ms apart     |
//! | off       | between 0 and 100 | one                   |
//! | on        | 0%                | one                   |
//! | on        | above 0%          | none                  |
//! | off       | 0%                | none                  |
//!
//! See the [`stepper`] module for the transitions themselves.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ack;
pub mod actor;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod stepper;
pub mod store;

pub use ack::Acknowledgment;
pub use actor::{DeviceActor, DeviceHandle};
pub use config::ControlConfig;
pub use error::{AckError, ControlError, Result};
pub use reconcile::{reconcile, Reconciliation};
pub use stepper::{Step, StepPlan};
pub use store::DeviceStateStore;

// Re-export commonly used types from dependencies for convenience
pub use aerogarden_core::{Brightness, DeviceId, DeviceState, LightStat, UserId};
