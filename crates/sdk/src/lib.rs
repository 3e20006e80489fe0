//! Relay SDK - Rust Client Library
//!
//! Typed client for the Relay Broker JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use relay_sdk::RelayClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RelayClient::connect("http://127.0.0.1:9527").await?;
//!
//!     client.subscribe("orders", "http://127.0.0.1:8080/hook").await?;
//!     client.push("orders", r#"{"order_id":42}"#).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::RelayClient;
pub use error::{code, Result, SdkError};
pub use types::{PushResponse, QueueStats, StatsResponse, SubscribeResponse};
