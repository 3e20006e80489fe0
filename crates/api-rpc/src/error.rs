//! RPC Error Types
//!
//! Maps broker errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use relay_core::domain::DomainError;
use thiserror::Error;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const UNKNOWN_QUEUE: i32 = 4001;
    pub const SUBSCRIBER_OVERFLOW: i32 = 4002;
    pub const QUEUE_OVERFLOW: i32 = 4003;
}

/// Failure to bring the server up
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("failed to register method {method}: {reason}")]
    Register { method: &'static str, reason: String },
}

/// Convert a DomainError to a JSON-RPC ErrorObject
pub fn domain_to_rpc_error(err: DomainError) -> ErrorObjectOwned {
    let code = match &err {
        DomainError::UnknownQueue { .. } => code::UNKNOWN_QUEUE,
        DomainError::SubscriberOverflow { .. } => code::SUBSCRIBER_OVERFLOW,
        DomainError::QueueOverflow { .. } => code::QUEUE_OVERFLOW,
        DomainError::InvalidConfig(_) => code::VALIDATION_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

/// Reject a request field before it reaches the broker
pub fn validation_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg.into(), None::<()>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_distinct_codes() {
        let unknown = DomainError::UnknownQueue {
            name: "payments".to_string(),
            expected: vec!["orders".to_string()],
        };
        let overflow = DomainError::QueueOverflow {
            name: "orders".to_string(),
            capacity: 2,
        };
        let subs = DomainError::SubscriberOverflow {
            name: "orders".to_string(),
            max_subscribers: 1,
        };

        assert_eq!(domain_to_rpc_error(unknown).code(), code::UNKNOWN_QUEUE);
        assert_eq!(domain_to_rpc_error(overflow).code(), code::QUEUE_OVERFLOW);
        assert_eq!(domain_to_rpc_error(subs).code(), code::SUBSCRIBER_OVERFLOW);
    }

    #[test]
    fn test_unknown_queue_message_lists_expected_names() {
        let err = domain_to_rpc_error(DomainError::UnknownQueue {
            name: "payments".to_string(),
            expected: vec!["orders".to_string(), "events".to_string()],
        });
        assert!(err.message().contains("orders"));
        assert!(err.message().contains("events"));
    }

    #[test]
    fn test_invalid_config_is_validation_error() {
        let err = domain_to_rpc_error(DomainError::InvalidConfig("x".to_string()));
        assert_eq!(err.code(), code::VALIDATION_ERROR);
    }
}
