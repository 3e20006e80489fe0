//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// Error codes returned by the broker
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const UNKNOWN_QUEUE: i32 = 4001;
    pub const SUBSCRIBER_OVERFLOW: i32 = 4002;
    pub const QUEUE_OVERFLOW: i32 = 4003;
}

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SdkError {
    pub fn is_unknown_queue(&self) -> bool {
        matches!(self, SdkError::Rpc { code: c, .. } if *c == code::UNKNOWN_QUEUE)
    }

    /// The queue buffer was full; the message was not kept
    pub fn is_queue_overflow(&self) -> bool {
        matches!(self, SdkError::Rpc { code: c, .. } if *c == code::QUEUE_OVERFLOW)
    }

    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self, SdkError::Rpc { code: c, .. } if *c == code::SUBSCRIBER_OVERFLOW)
    }
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => SdkError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
            },
            jsonrpsee::core::ClientError::Transport(e) => {
                SdkError::Transport(format!("Transport error: {}", e))
            }
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => {
                SdkError::Other(format!("Parse error: {}", e))
            }
            _ => SdkError::Other(e.to_string()),
        }
    }
}
