//! Webhook transport.

use crate::WebhookPayload;
use loadout_error::{DeliveryError, DeliveryErrorKind, LoadoutResult};
use std::time::Duration;

/// Posts one payload to one destination.
#[async_trait::async_trait]
pub trait WebhookSender: Send + Sync {
    /// POST `payload` as JSON to `url`. Any 2xx answer is success.
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), DeliveryError>;
}

/// [`WebhookSender`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpWebhookSender {
    client: reqwest::Client,
}

impl HttpWebhookSender {
    /// Create a sender whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> LoadoutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::new(DeliveryErrorKind::Transport(e.to_string())))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::new(DeliveryErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::new(DeliveryErrorKind::Status(status.as_u16())))
        }
    }
}
