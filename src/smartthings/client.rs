use crate::app_config::AppConfig;
use crate::smartthings::domain::{ComponentStatus, Device, ListResponse};
use crate::smartthings::{ApiError, DeviceSource};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

pub fn new_client(config: &AppConfig, version: &str) -> Result<Client, ClientError> {
    let mut headers = header::HeaderMap::new();
    let mut authorization_value = HeaderValue::from_str(&format!("Bearer {}", config.smartthings().api_token()))?;
    authorization_value.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, authorization_value);
    headers.insert(header::USER_AGENT, HeaderValue::from_str(&format!("smartthings-exporter/{}", version))?);

    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("SmartThings client set an invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}

#[derive(Debug, Clone)]
pub struct SmartThingsClient {
    client: Client,
    url: String,
}

impl SmartThingsClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        SmartThingsClient {
            client,
            url: config.smartthings().url().to_string(),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_devices(&self) -> Result<Vec<Device>, ApiError> {
        let mut devices = Vec::new();
        let mut visited = HashSet::new();
        let mut next_url = Some(format!("{}/devices", self.url));

        while let Some(url) = next_url.take() {
            let page = self.get::<ListResponse<Device>>(&url).await?;
            devices.extend(page.items.into_iter());
            visited.insert(url);

            match page.links.next {
                Some(link) if visited.contains(&link.href) => {
                    warn!("⚠️ Device list links back to an already fetched page, stopping at '{}'", link.href)
                }
                Some(link) => next_url = Some(link.href),
                None => {}
            }
        }

        debug!("Retrieved {} device(s)", devices.len());
        Ok(devices)
    }

    #[instrument(skip(self))]
    async fn fetch_component_status(&self, device_id: &str, component_id: &str) -> Result<ComponentStatus, ApiError> {
        self.get(&format!("{}/devices/{}/components/{}/status", self.url, device_id, component_id))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!(%status, "Raw response from '{}': {}", url, body);

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DeviceSource for SmartThingsClient {
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.fetch_devices().await
    }

    async fn component_status(&self, device_id: &str, component_id: &str) -> Result<ComponentStatus, ApiError> {
        self.fetch_component_status(device_id, component_id).await
    }
}
