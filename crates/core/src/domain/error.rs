// Domain Error Types

use thiserror::Error;

/// Caller-facing rejections from the broker surface.
///
/// Every variant is recoverable by the caller: pick a configured queue name,
/// retry later, or drop the write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("queue name must be one of {expected:?}, got {name:?}")]
    UnknownQueue { name: String, expected: Vec<String> },

    #[error("queue overflow: {name} is at capacity ({capacity})")]
    QueueOverflow { name: String, capacity: usize },

    #[error("subscribers overflow: {name} already has {max_subscribers} subscribers")]
    SubscriberOverflow { name: String, max_subscribers: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
