//! Remote device gateway for the Aerogarden cloud API.
//!
//! The cloud service exposes two form-encoded POST endpoints that matter for
//! the light:
//!
//! - `UpdateDeviceConfig` flips the light via `plantConfig={"lightStat":N}`
//! - `QueryUserDevice` lists the account's devices with their `lightStat`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │  Device actor    │────▶│  RemoteGateway   │
//! │  (control)       │     │  (trait)         │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │ HttpRemoteGateway│
//!                          │ (reqwest)        │
//!                          └────────┬─────────┘
//!                                   │ HTTP
//!                          ┌────────▼─────────┐
//!                          │  Aerogarden API  │
//!                          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use aerogarden_core::{DeviceId, LightStat, UserId};
//! use aerogarden_remote::{HttpRemoteGateway, RemoteConfig, RemoteGateway};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpRemoteGateway::new(RemoteConfig::default());
//! let device_id = DeviceId::new("AA:BB:CC:DD:EE:FF")?;
//! let user_id = UserId::new("123456")?;
//!
//! gateway.update_config(&device_id, &user_id, LightStat::On).await?;
//! let record = gateway.query_state(&user_id).await?;
//! println!("lightStat = {}", record.light_stat.as_u8());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::time::Duration;

use serde::Deserialize;

pub mod client;
pub mod error;
pub mod gateway;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use client::HttpRemoteGateway;
pub use error::{RemoteError, Result};
pub use gateway::{DeviceRecord, RemoteGateway};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockRemoteGateway, UpdateCall};

/// Path of the toggle endpoint.
pub const UPDATE_CONFIG_PATH: &str = "/api/Custom/UpdateDeviceConfig";

/// Path of the device query endpoint.
pub const QUERY_DEVICE_PATH: &str = "/api/CustomData/QueryUserDevice";

/// Configuration for the remote device API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the service, without a trailing slash.
    #[serde(default = "RemoteConfig::default_base_url")]
    pub base_url: String,

    /// Client identifier sent as `User-Agent`.
    #[serde(default = "RemoteConfig::default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "RemoteConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Connect timeout in seconds.
    #[serde(default = "RemoteConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl RemoteConfig {
    fn default_base_url() -> String {
        "http://ec2-54-86-39-88.compute-1.amazonaws.com:8080".to_string()
    }

    fn default_user_agent() -> String {
        "HA-Aerogarden/0.1".to_string()
    }

    const fn default_request_timeout() -> u64 {
        10
    }

    const fn default_connect_timeout() -> u64 {
        5
    }

    /// Create a configuration pointing at a different base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Get the toggle endpoint URL.
    #[must_use]
    pub fn update_config_url(&self) -> String {
        format!("{}{UPDATE_CONFIG_PATH}", self.base_url)
    }

    /// Get the device query endpoint URL.
    #[must_use]
    pub fn query_device_url(&self) -> String {
        format!("{}{QUERY_DEVICE_PATH}", self.base_url)
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the connect timeout as a `Duration`.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            user_agent: Self::default_user_agent(),
            request_timeout_seconds: Self::default_request_timeout(),
            connect_timeout_seconds: Self::default_connect_timeout(),
        }
    }
}
