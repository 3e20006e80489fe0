//! SDK Response Types
//!
//! Mirrors the JSON-RPC results from the api-rpc crate.

use serde::Deserialize;

/// Response from push
#[derive(Debug, Clone, Deserialize)]
pub struct PushResponse {
    pub queue: String,
    pub accepted: bool,
}

/// Response from subscribe
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeResponse {
    pub queue: String,
    pub callback: String,
}

/// Per-queue snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub pending: usize,
    pub capacity: usize,
    pub subscribers: usize,
    pub max_subscribers: usize,
}

/// Response from admin stats
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub queues: Vec<QueueStats>,
    pub deliveries_in_flight: usize,
    pub delivery_workers: usize,
    pub dispatcher_restarts: u32,
}
