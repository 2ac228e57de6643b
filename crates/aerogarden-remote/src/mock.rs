//! In-memory gateway for tests.
//!
//! Records every toggle with the (tokio) instant it was issued and answers
//! queries from a scripted `lightStat`, optionally after an artificial delay.

use std::time::Duration;

use aerogarden_core::{DeviceId, LightStat, UserId};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::{RemoteError, Result};
use crate::gateway::{DeviceRecord, RemoteGateway};

/// A toggle command observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    /// Device the command addressed.
    pub device_id: DeviceId,
    /// The flag that was sent.
    pub light_stat: LightStat,
    /// When the call started.
    pub at: Instant,
}

#[derive(Debug)]
struct MockState {
    updates: Vec<UpdateCall>,
    queries: usize,
    /// `None` makes queries fail with a transport error.
    query_light_stat: Option<LightStat>,
    fail_updates: bool,
    update_latency: Duration,
    query_latency: Duration,
}

/// Scriptable `RemoteGateway` that never touches the network.
#[derive(Debug)]
pub struct MockRemoteGateway {
    state: Mutex<MockState>,
}

impl Default for MockRemoteGateway {
    fn default() -> Self {
        Self {
            state: Mutex::new(MockState {
                updates: Vec::new(),
                queries: 0,
                query_light_stat: Some(LightStat::Off),
                fail_updates: false,
                update_latency: Duration::ZERO,
                query_latency: Duration::ZERO,
            }),
        }
    }
}

impl MockRemoteGateway {
    /// Create a mock that accepts toggles and reports the light as off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the `lightStat` returned by queries; `None` makes them fail.
    pub fn set_query_response(&self, light_stat: Option<LightStat>) {
        self.state.lock().query_light_stat = light_stat;
    }

    /// Make toggles fail with a transport error.
    pub fn set_fail_updates(&self, fail: bool) {
        self.state.lock().fail_updates = fail;
    }

    /// Delay every toggle by `latency` before it completes.
    pub fn set_update_latency(&self, latency: Duration) {
        self.state.lock().update_latency = latency;
    }

    /// Delay every query by `latency` before it completes.
    pub fn set_query_latency(&self, latency: Duration) {
        self.state.lock().query_latency = latency;
    }

    /// All toggles issued so far, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<UpdateCall> {
        self.state.lock().updates.clone()
    }

    /// Just the flags of the toggles issued so far.
    #[must_use]
    pub fn light_stats(&self) -> Vec<LightStat> {
        self.state.lock().updates.iter().map(|u| u.light_stat).collect()
    }

    /// Number of queries received.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.state.lock().queries
    }
}

#[async_trait]
impl RemoteGateway for MockRemoteGateway {
    async fn update_config(
        &self,
        device_id: &DeviceId,
        _user_id: &UserId,
        light_stat: LightStat,
    ) -> Result<()> {
        let (latency, fail) = {
            let mut state = self.state.lock();
            state.updates.push(UpdateCall {
                device_id: device_id.clone(),
                light_stat,
                at: Instant::now(),
            });
            (state.update_latency, state.fail_updates)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if fail {
            Err(RemoteError::Transport("mock toggle failure".to_string()))
        } else {
            Ok(())
        }
    }

    async fn query_state(&self, _user_id: &UserId) -> Result<DeviceRecord> {
        let (latency, response) = {
            let mut state = self.state.lock();
            state.queries += 1;
            (state.query_latency, state.query_light_stat)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        response
            .map(|light_stat| DeviceRecord { light_stat })
            .ok_or_else(|| RemoteError::Transport("mock query failure".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_updates() {
        let mock = MockRemoteGateway::new();
        let device_id = DeviceId::new("garden-1").unwrap();
        let user_id = UserId::new("42").unwrap();

        mock.update_config(&device_id, &user_id, LightStat::On)
            .await
            .unwrap();
        mock.update_config(&device_id, &user_id, LightStat::Off)
            .await
            .unwrap();

        assert_eq!(mock.light_stats(), vec![LightStat::On, LightStat::Off]);
        assert_eq!(mock.updates()[0].device_id, device_id);
    }

    #[tokio::test]
    async fn scripted_queries() {
        let mock = MockRemoteGateway::new();
        let user_id = UserId::new("42").unwrap();

        mock.set_query_response(Some(LightStat::On));
        assert_eq!(
            mock.query_state(&user_id).await.unwrap().light_stat,
            LightStat::On
        );

        mock.set_query_response(None);
        assert!(mock.query_state(&user_id).await.unwrap_err().is_transport());
        assert_eq!(mock.query_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_updates_still_recorded() {
        let mock = MockRemoteGateway::new();
        mock.set_fail_updates(true);
        mock.set_update_latency(Duration::from_secs(5));
        let device_id = DeviceId::new("garden-1").unwrap();
        let user_id = UserId::new("42").unwrap();

        let start = Instant::now();
        let result = mock.update_config(&device_id, &user_id, LightStat::On).await;
        assert!(result.is_err());
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(mock.updates().len(), 1);
    }
}
