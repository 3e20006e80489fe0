//! Fan-out Delivery - send one message to every subscriber of its queue
//!
//! Each subscriber gets an independent attempt bounded by the callback timeout.
//! Failures are logged and skipped: no retry, no dead-lettering, and no effect
//! on the remaining subscribers.

use super::queue::Queue;
use crate::domain::Message;
use crate::port::{CallbackSender, DeliveryError};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome counts of one fan-out pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Fan-out delivery service
pub struct FanOut {
    sender: Arc<dyn CallbackSender>,
    callback_timeout: Duration,
}

impl FanOut {
    pub fn new(sender: Arc<dyn CallbackSender>, callback_timeout: Duration) -> Self {
        Self {
            sender,
            callback_timeout,
        }
    }

    /// Deliver `message` to the current subscribers of `queue`
    ///
    /// Holds shared read access to the subscriber list for the whole pass;
    /// a concurrent Subscribe waits for the pass to finish. Attempts run
    /// concurrently inside the calling task, so a slow subscriber costs at
    /// most one timeout and never delays its siblings.
    pub async fn deliver(&self, queue: &Queue, message: &Message) -> FanOutReport {
        let subscribers = queue.subscribers().await;
        let mut report = FanOutReport::default();

        if subscribers.is_empty() {
            debug!(queue = %queue.name(), "no subscribers, message dropped");
            return report;
        }

        let attempts = subscribers.iter().map(|callback| async move {
            let result = tokio::time::timeout(
                self.callback_timeout,
                self.sender.send(callback, message, self.callback_timeout),
            )
            .await
            .unwrap_or_else(|_| {
                Err(DeliveryError::Timeout(
                    self.callback_timeout.as_millis() as u64
                ))
            });
            (callback, result)
        });

        for (callback, result) in join_all(attempts).await {
            report.attempted += 1;
            match result {
                Ok(receipt) => {
                    report.delivered += 1;
                    debug!(
                        queue = %queue.name(),
                        callback = %callback,
                        status = receipt.status,
                        duration_ms = receipt.duration_ms,
                        "message delivered"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        queue = %queue.name(),
                        callback = %callback,
                        error = %e,
                        "failed to send message"
                    );
                }
            }
        }

        report
    }
}
