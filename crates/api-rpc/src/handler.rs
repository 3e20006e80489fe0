//! RPC Method Handlers

use crate::error::{domain_to_rpc_error, validation_error};
use crate::types::{
    PayloadEncoding, PushRequest, PushResponse, StatsResponse, SubscribeRequest,
    SubscribeResponse,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use jsonrpsee::types::ErrorObjectOwned;
use relay_core::{Broker, Message};
use std::sync::Arc;
use tracing::debug;

/// RPC Handler backed by a running broker
pub struct RpcHandler {
    broker: Arc<Broker>,
}

impl RpcHandler {
    pub fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }

    /// queue.push.v1
    pub async fn push(&self, params: PushRequest) -> Result<PushResponse, ErrorObjectOwned> {
        let payload = match params.encoding {
            PayloadEncoding::Utf8 => Message::from(params.message),
            PayloadEncoding::Base64 => STANDARD
                .decode(params.message.as_bytes())
                .map(Message::from)
                .map_err(|e| validation_error(format!("message is not valid base64: {}", e)))?,
        };

        let bytes = payload.len();
        self.broker
            .push(&params.queue, payload)
            .map_err(domain_to_rpc_error)?;

        debug!(queue = %params.queue, bytes = bytes, "Message accepted");

        Ok(PushResponse {
            queue: params.queue,
            accepted: true,
        })
    }

    /// queue.subscribe.v1
    pub async fn subscribe(
        &self,
        params: SubscribeRequest,
    ) -> Result<SubscribeResponse, ErrorObjectOwned> {
        // Stored verbatim; an unusable address surfaces as a delivery failure
        self.broker
            .subscribe(&params.queue, params.callback.clone())
            .await
            .map_err(domain_to_rpc_error)?;

        Ok(SubscribeResponse {
            queue: params.queue,
            callback: params.callback,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        Ok(self.broker.stats().await)
    }
}
