//! JSON-RPC API Layer
//!
//! Exposes the broker's Push / Subscribe operations and a stats snapshot
//! over JSON-RPC 2.0.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
