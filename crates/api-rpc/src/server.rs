//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP on TCP.

use crate::error::ServerError;
use crate::handler::RpcHandler;
use crate::types::{PushRequest, SubscribeRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::error::INVALID_PARAMS_CODE;
use jsonrpsee::types::{ErrorObjectOwned, Params};
use jsonrpsee::RpcModule;
use relay_core::Broker;
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, broker: Arc<Broker>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(broker)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Port `0` binds an ephemeral port; the returned address is the one
    /// actually bound.
    pub async fn start(self) -> Result<(ServerHandle, SocketAddr), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;
        let local_addr = server.local_addr().map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("queue.push.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PushRequest = parse_params(params)?;
                    handler.push(req).await
                }
            })
            .map_err(|e| ServerError::Register {
                method: "queue.push.v1",
                reason: e.to_string(),
            })?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.subscribe.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: SubscribeRequest = parse_params(params)?;
                    handler.subscribe(req).await
                }
            })
            .map_err(|e| ServerError::Register {
                method: "queue.subscribe.v1",
                reason: e.to_string(),
            })?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| ServerError::Register {
                method: "admin.stats.v1",
                reason: e.to_string(),
            })?;

        let handle = server.start(module);
        info!(addr = %local_addr, "JSON-RPC server started");

        Ok((handle, local_addr))
    }
}

/// Accept named params (`{..}`) or a single positional object (`[{..}]`)
fn parse_params<T: DeserializeOwned>(params: Params<'_>) -> Result<T, ErrorObjectOwned> {
    let value: serde_json::Value = params.parse()?;
    let value = match value {
        serde_json::Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| ErrorObjectOwned::owned(INVALID_PARAMS_CODE, e.to_string(), None::<()>))
}
