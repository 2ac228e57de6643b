//! HTTP implementation of the remote gateway.
//!
//! Both endpoints take form-encoded POST bodies. The toggle endpoint embeds
//! a small JSON document in its `plantConfig` field.

use aerogarden_core::{DeviceId, LightStat, UserId};
use async_trait::async_trait;
use serde::Serialize;

use crate::error::{RemoteError, Result};
use crate::gateway::{DeviceRecord, RemoteGateway};
use crate::RemoteConfig;

/// Garden slot addressed by every toggle. Multi-garden devices are not supported.
const GARDEN_INDEX: u8 = 0;

/// Form body for `UpdateDeviceConfig`.
#[derive(Debug, Serialize)]
struct UpdateConfigForm<'a> {
    #[serde(rename = "airGuid")]
    air_guid: &'a str,
    #[serde(rename = "chooseGarden")]
    choose_garden: u8,
    #[serde(rename = "userID")]
    user_id: &'a str,
    #[serde(rename = "plantConfig")]
    plant_config: String,
}

/// JSON document carried in `plantConfig`.
#[derive(Debug, Serialize)]
struct PlantConfig {
    #[serde(rename = "lightStat")]
    light_stat: LightStat,
}

/// Form body for `QueryUserDevice`.
#[derive(Debug, Serialize)]
struct QueryDeviceForm<'a> {
    #[serde(rename = "userID")]
    user_id: &'a str,
}

/// HTTP client for the Aerogarden cloud API.
#[derive(Debug, Clone)]
pub struct HttpRemoteGateway {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl HttpRemoteGateway {
    /// Create a new gateway from configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should never happen with default TLS).
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .expect("failed to create HTTP client");

        Self { client, config }
    }

    /// Create a gateway with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// POST a form and return the response if the status is a success.
    async fn post_form<T: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &T,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::USER_AGENT, self.config.user_agent.as_str())
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!(url = %url, status = %status, "Remote API rejected request");
            Err(RemoteError::Status {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn update_config(
        &self,
        device_id: &DeviceId,
        user_id: &UserId,
        light_stat: LightStat,
    ) -> Result<()> {
        let plant_config = serde_json::to_string(&PlantConfig { light_stat })
            .map_err(|e| RemoteError::Encode(e.to_string()))?;

        let form = UpdateConfigForm {
            air_guid: device_id.as_str(),
            choose_garden: GARDEN_INDEX,
            user_id: user_id.as_str(),
            plant_config,
        };

        self.post_form(&self.config.update_config_url(), &form)
            .await?;

        tracing::debug!(
            device_id = %device_id,
            light_stat = light_stat.as_u8(),
            "Sent light toggle"
        );
        Ok(())
    }

    async fn query_state(&self, user_id: &UserId) -> Result<DeviceRecord> {
        let form = QueryDeviceForm {
            user_id: user_id.as_str(),
        };

        let response = self
            .post_form(&self.config.query_device_url(), &form)
            .await?;

        let records: Vec<DeviceRecord> = response.json().await?;

        let record = records
            .into_iter()
            .next()
            .ok_or(RemoteError::EmptyDeviceList)?;

        tracing::debug!(light_stat = record.light_stat.as_u8(), "Queried device state");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_string, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{QUERY_DEVICE_PATH, UPDATE_CONFIG_PATH};

    fn ids() -> (DeviceId, UserId) {
        (
            DeviceId::new("garden-1").unwrap(),
            UserId::new("42").unwrap(),
        )
    }

    fn gateway_for(server: &MockServer) -> HttpRemoteGateway {
        HttpRemoteGateway::new(RemoteConfig::with_base_url(server.uri()))
    }

    #[test]
    fn plant_config_json() {
        let json = serde_json::to_string(&PlantConfig {
            light_stat: LightStat::On,
        })
        .unwrap();
        assert_eq!(json, r#"{"lightStat":1}"#);
    }

    #[test]
    fn client_creation() {
        let gateway = HttpRemoteGateway::new(RemoteConfig::default());
        assert_eq!(gateway.config().user_agent, "HA-Aerogarden/0.1");
    }

    #[tokio::test]
    async fn update_config_sends_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(UPDATE_CONFIG_PATH))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(header("user-agent", "HA-Aerogarden/0.1"))
            .and(body_string(
                "airGuid=garden-1&chooseGarden=0&userID=42&plantConfig=%7B%22lightStat%22%3A1%7D",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("true"))
            .expect(1)
            .mount(&server)
            .await;

        let (device_id, user_id) = ids();
        gateway_for(&server)
            .update_config(&device_id, &user_id, LightStat::On)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_config_off_encodes_zero() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(UPDATE_CONFIG_PATH))
            .and(body_string_contains("plantConfig=%7B%22lightStat%22%3A0%7D"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (device_id, user_id) = ids();
        gateway_for(&server)
            .update_config(&device_id, &user_id, LightStat::Off)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_config_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(UPDATE_CONFIG_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (device_id, user_id) = ids();
        let result = gateway_for(&server)
            .update_config(&device_id, &user_id, LightStat::On)
            .await;
        assert!(matches!(result, Err(RemoteError::Status { status: 500 })));
    }

    #[tokio::test]
    async fn query_state_reads_first_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_DEVICE_PATH))
            .and(body_string("userID=42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"airGuid":"garden-1","lightStat":0},{"airGuid":"garden-2","lightStat":1}]"#,
            ))
            .mount(&server)
            .await;

        let (_, user_id) = ids();
        let record = gateway_for(&server).query_state(&user_id).await.unwrap();
        assert_eq!(record.light_stat, LightStat::Off);
    }

    #[tokio::test]
    async fn query_state_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_DEVICE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let (_, user_id) = ids();
        let result = gateway_for(&server).query_state(&user_id).await;
        assert!(matches!(result, Err(RemoteError::EmptyDeviceList)));
    }

    #[tokio::test]
    async fn query_state_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_DEVICE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let (_, user_id) = ids();
        let err = gateway_for(&server).query_state(&user_id).await.unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
        assert!(err.is_decode());
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn query_state_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(QUERY_DEVICE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"lightStat":1}]"#)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let gateway = HttpRemoteGateway::with_client(client, RemoteConfig::with_base_url(server.uri()));

        let (_, user_id) = ids();
        let err = gateway.query_state(&user_id).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let gateway = HttpRemoteGateway::new(RemoteConfig::with_base_url("http://127.0.0.1:1"));
        let (device_id, user_id) = ids();
        let err = gateway
            .update_config(&device_id, &user_id, LightStat::On)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
