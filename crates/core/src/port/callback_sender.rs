// Callback Sender Port
// Abstraction for the outbound request that delivers one message to one subscriber

use crate::domain::{CallbackUrl, Message};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Successful delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub duration_ms: u64,
}

/// Delivery errors (terminal for the one subscriber they occur on)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Invalid callback address {url}: {reason}")]
    InvalidAddress { url: String, reason: String },

    #[error("Delivery timeout after {0}ms")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Callback rejected with status {status}")]
    Rejected { status: u16 },
}

/// Callback Sender trait
///
/// Implementations:
/// - HttpCallbackSender: POSTs the payload to the callback URL
#[async_trait]
pub trait CallbackSender: Send + Sync {
    /// Deliver `message` to `url`, giving up after `timeout`
    ///
    /// # Errors
    /// - DeliveryError::InvalidAddress if the URL cannot be used
    /// - DeliveryError::Timeout if no response arrived in time
    /// - DeliveryError::Transport on connection failures
    /// - DeliveryError::Rejected on a non-success response
    async fn send(
        &self,
        url: &CallbackUrl,
        message: &Message,
        timeout: Duration,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock sender behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Always fail with a transport error
        Fail(String),
        /// Respond with a non-success status
        Reject(u16),
        /// Sleep for the full duration, then succeed
        Delay(Duration),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// A recorded send call
    #[derive(Debug, Clone)]
    struct SentMessage {
        url: CallbackUrl,
        payload: Vec<u8>,
    }

    /// Mock Callback Sender for testing
    ///
    /// Behavior is chosen per URL when an override exists, otherwise the default applies.
    pub struct MockCallbackSender {
        default: Arc<Mutex<MockBehavior>>,
        overrides: Arc<Mutex<Vec<(String, MockBehavior)>>>,
        sent: Arc<Mutex<Vec<SentMessage>>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockCallbackSender {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                default: Arc::new(Mutex::new(behavior)),
                overrides: Arc::new(Mutex::new(Vec::new())),
                sent: Arc::new(Mutex::new(Vec::new())),
                call_count: Arc::new(Mutex::new(0)),
            }
        }
        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }
        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }
        /// Use `behavior` for one specific callback URL
        pub fn with_override(self, url: impl Into<String>, behavior: MockBehavior) -> Self {
            self.overrides.lock().unwrap().push((url.into(), behavior));
            self
        }
        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.default.lock().unwrap() = behavior;
        }
        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
        pub fn sent_to(&self, url: &str) -> Vec<Vec<u8>> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.url.as_str() == url)
                .map(|m| m.payload.clone())
                .collect()
        }

        fn behavior_for(&self, url: &CallbackUrl) -> MockBehavior {
            let overrides = self.overrides.lock().unwrap();
            overrides
                .iter()
                .find(|(u, _)| u == url.as_str())
                .map(|(_, b)| b.clone())
                .unwrap_or_else(|| self.default.lock().unwrap().clone())
        }

        fn record(&self, url: &CallbackUrl, message: &Message) {
            self.sent.lock().unwrap().push(SentMessage {
                url: url.clone(),
                payload: message.bytes().to_vec(),
            });
        }
    }

    #[async_trait]
    impl CallbackSender for MockCallbackSender {
        async fn send(
            &self,
            url: &CallbackUrl,
            message: &Message,
            _timeout: Duration,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            *self.call_count.lock().unwrap() += 1;

            match self.behavior_for(url) {
                MockBehavior::Success => {
                    self.record(url, message);
                    Ok(DeliveryReceipt {
                        status: 200,
                        duration_ms: 0,
                    })
                }
                MockBehavior::Fail(msg) => Err(DeliveryError::Transport(msg)),
                MockBehavior::Reject(status) => Err(DeliveryError::Rejected { status }),
                MockBehavior::Delay(delay) => {
                    // Ignores `timeout`: bounding the attempt is the caller's job
                    tokio::time::sleep(delay).await;
                    self.record(url, message);
                    Ok(DeliveryReceipt {
                        status: 200,
                        duration_ms: delay.as_millis() as u64,
                    })
                }
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
