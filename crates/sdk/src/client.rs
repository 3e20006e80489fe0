//! Relay Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{PushResponse, StatsResponse, SubscribeResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

/// Relay Broker Client
///
/// # Example
///
/// ```no_run
/// use relay_sdk::RelayClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RelayClient::connect("http://127.0.0.1:9527").await?;
/// # Ok(())
/// # }
/// ```
pub struct RelayClient {
    client: HttpClient,
}

impl RelayClient {
    /// Connect to the broker daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9527`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Push a message onto a queue
    ///
    /// Success means the broker buffered the message, not that any
    /// subscriber received it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relay_sdk::RelayClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = RelayClient::connect("http://127.0.0.1:9527").await?;
    /// match client.push("orders", "order-42").await {
    ///     Ok(_) => {}
    ///     Err(e) if e.is_queue_overflow() => eprintln!("broker is saturated, retry later"),
    ///     Err(e) => return Err(e.into()),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn push(
        &self,
        queue: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<PushResponse> {
        let mut params = ObjectParams::new();
        params.insert("queue", queue.into())?;
        params.insert("message", message.into())?;

        let response: PushResponse = self.client.request("queue.push.v1", params).await?;
        Ok(response)
    }

    /// Push an arbitrary binary payload
    ///
    /// The bytes travel base64-encoded and reach subscribers unchanged.
    pub async fn push_bytes(
        &self,
        queue: impl Into<String>,
        payload: impl AsRef<[u8]>,
    ) -> Result<PushResponse> {
        let mut params = ObjectParams::new();
        params.insert("queue", queue.into())?;
        params.insert("message", STANDARD.encode(payload))?;
        params.insert("encoding", "base64")?;

        let response: PushResponse = self.client.request("queue.push.v1", params).await?;
        Ok(response)
    }

    /// Register a callback URL on a queue
    pub async fn subscribe(
        &self,
        queue: impl Into<String>,
        callback: impl Into<String>,
    ) -> Result<SubscribeResponse> {
        let mut params = ObjectParams::new();
        params.insert("queue", queue.into())?;
        params.insert("callback", callback.into())?;

        let response: SubscribeResponse =
            self.client.request("queue.subscribe.v1", params).await?;
        Ok(response)
    }

    /// Broker statistics snapshot
    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self.client.request("admin.stats.v1", rpc_params![]).await?;
        Ok(response)
    }
}
