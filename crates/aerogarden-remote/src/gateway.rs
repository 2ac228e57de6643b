//! The remote gateway abstraction.

use aerogarden_core::{DeviceId, LightStat, UserId};
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// One entry of the `QueryUserDevice` response list.
///
/// Only the light flag is read; the service sends many other fields, which
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeviceRecord {
    /// Whether the device reports its light as on.
    #[serde(rename = "lightStat")]
    pub light_stat: LightStat,
}

/// Trait for talking to the remote device API.
///
/// This trait abstracts the HTTP transport, allowing for mock
/// implementations in tests. Implementations never retry.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Send the toggle command carrying `light_stat`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn update_config(
        &self,
        device_id: &DeviceId,
        user_id: &UserId,
        light_stat: LightStat,
    ) -> Result<()>;

    /// Query the account's devices and return the authoritative first record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body is malformed, or the
    /// device list is empty.
    async fn query_state(&self, user_id: &UserId) -> Result<DeviceRecord>;
}
