//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use relay_core::BrokerStats;
use serde::{Deserialize, Serialize};

/// How `PushRequest::message` maps to payload bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// The string's UTF-8 bytes
    #[default]
    Utf8,
    /// Standard base64 (padded), for arbitrary binary payloads
    Base64,
}

/// queue.push.v1 - Buffer a message on a queue
#[derive(Debug, Deserialize)]
pub struct PushRequest {
    pub queue: String,
    pub message: String,
    #[serde(default)]
    pub encoding: PayloadEncoding,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushResponse {
    pub queue: String,
    pub accepted: bool,
}

/// queue.subscribe.v1 - Register a callback address
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub queue: String,
    pub callback: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResponse {
    pub queue: String,
    pub callback: String,
}

/// admin.stats.v1 - Broker statistics (no parameters)
pub type StatsResponse = BrokerStats;
