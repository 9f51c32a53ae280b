use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// What the podcast worker receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPayload {
    /// `YYYY-MM-DD`
    #[serde(rename = "today")]
    pub date: String,
    #[serde(rename = "custom_script")]
    pub script: String,
}

impl DeliveryPayload {
    pub fn new(date: NaiveDate, script: impl Into<String>) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            script: script.into(),
        }
    }
}

#[async_trait]
pub trait Delivery: Send + Sync {
    /// Ok only when the receiver confirmed with a 2xx.
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<()>;
}

pub type DynDelivery = Arc<dyn Delivery>;

/// JSON POST to a webhook. One attempt per cycle; the poll loop is the retry.
#[derive(Clone)]
pub struct WebhookDelivery {
    url: String,
    client: Client,
    timeout: Duration,
}

impl WebhookDelivery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Delivery for WebhookDelivery {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<()> {
        let rsp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = rsp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = rsp.text().await.unwrap_or_default();
        Err(BridgeError::DeliveryStatus {
            status: status.as_u16(),
            body: body.chars().take(500).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_worker_field_names() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let v = serde_json::to_value(DeliveryPayload::new(date, "老张：开场")).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "today": "2025-03-07", "custom_script": "老张：开场" })
        );
    }
}
