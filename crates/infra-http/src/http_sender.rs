// HTTP Callback Sender - POSTs each message to a subscriber URL
// One pooled reqwest client shared by every delivery
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};
use tracing::debug;

use relay_core::domain::{CallbackUrl, Message};
use relay_core::port::{CallbackSender, DeliveryError, DeliveryReceipt};

const PAYLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Delivers messages by POSTing the raw payload to the callback URL.
///
/// One `reqwest::Client` (and its connection pool) is shared by all deliveries.
#[derive(Clone)]
pub struct HttpCallbackSender {
    client: Client,
}

impl HttpCallbackSender {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Parse a callback address, accepting only http(s) targets
    fn parse_url(url: &CallbackUrl) -> Result<Url, DeliveryError> {
        let parsed = Url::parse(url.as_str()).map_err(|e| DeliveryError::InvalidAddress {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(DeliveryError::InvalidAddress {
                url: url.to_string(),
                reason: format!("unsupported scheme {}", scheme),
            }),
        }
    }

    fn classify(err: reqwest::Error, timeout: Duration) -> DeliveryError {
        if err.is_timeout() {
            DeliveryError::Timeout(timeout.as_millis() as u64)
        } else if err.is_builder() {
            DeliveryError::InvalidAddress {
                url: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_default(),
                reason: err.to_string(),
            }
        } else {
            DeliveryError::Transport(err.to_string())
        }
    }
}

impl Default for HttpCallbackSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallbackSender for HttpCallbackSender {
    async fn send(
        &self,
        url: &CallbackUrl,
        message: &Message,
        timeout: Duration,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let target = Self::parse_url(url)?;
        let started = Instant::now();

        let response = self
            .client
            .post(target)
            .header(CONTENT_TYPE, PAYLOAD_CONTENT_TYPE)
            .timeout(timeout)
            .body(message.bytes().clone())
            .send()
            .await
            .map_err(|e| Self::classify(e, timeout))?;

        let status = response.status();
        let duration_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(
            callback = %url,
            status = status.as_u16(),
            duration_ms = duration_ms,
            bytes = message.len(),
            "Callback accepted message"
        );

        Ok(DeliveryReceipt {
            status: status.as_u16(),
            duration_ms,
        })
    }
}
