// Domain Layer - Pure value types and configuration

pub mod config;
pub mod error;
pub mod message;
pub mod queue;

// Re-exports
pub use config::{BrokerConfig, RestartPolicy};
pub use error::DomainError;
pub use message::{CallbackUrl, Message};
pub use queue::{QueueName, QueueStats};
