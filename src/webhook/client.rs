use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::EnquirySink;
use super::error::WebhookError;
use crate::model::EnquiryFormData;

/// How much of the webhook's response is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Fire and forget: any response, including an HTTP error, counts as delivered.
    #[default]
    Opaque,
    /// Non-2xx responses are reported as [`WebhookError::Status`].
    Checked,
}

/// HTTP client bound to the configured webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    endpoint: Url,
    mode: DeliveryMode,
}

impl WebhookClient {
    /// Builds a client that posts to `endpoint`, giving up after `timeout`.
    pub fn new(endpoint: Url, timeout: Duration, mode: DeliveryMode) -> Result<Self, WebhookError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WebhookError::Client)?;
        Ok(Self {
            http,
            endpoint,
            mode,
        })
    }

    /// Returns the endpoint submissions are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the configured delivery mode.
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }
}

impl EnquirySink for WebhookClient {
    async fn deliver(&self, form: &EnquiryFormData) -> Result<(), WebhookError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(form)
            .send()
            .await
            .map_err(WebhookError::Transport)?;

        match self.mode {
            DeliveryMode::Opaque => {
                tracing::debug!("webhook response left unread (opaque delivery)");
                Ok(())
            }
            DeliveryMode::Checked => {
                let status = response.status();
                tracing::debug!(%status, "webhook responded");
                if status.is_success() {
                    Ok(())
                } else {
                    Err(WebhookError::Status(status))
                }
            }
        }
    }
}
