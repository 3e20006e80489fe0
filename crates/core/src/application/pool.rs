// Delivery Pool - bounded process-wide fan-out concurrency
use super::fanout::FanOut;
use super::panic_guard::{execute_guarded, PanicGuardResult};
use super::queue::Queue;
use crate::domain::Message;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error};

/// Fixed-size permit pool for fan-out operations.
///
/// `submit` waits for a free permit before spawning, so a burst of ready
/// messages never produces more than `size` concurrent fan-outs; the excess
/// stays in the queue buffers.
#[derive(Clone)]
pub struct DeliveryPool {
    permits: Arc<Semaphore>,
    size: usize,
    fanout: Arc<FanOut>,
}

impl DeliveryPool {
    pub fn new(size: usize, fanout: Arc<FanOut>) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
            fanout,
        }
    }

    /// Hand `message` off to a fan-out task, waiting for capacity first
    ///
    /// Returns once the task is spawned; it does not wait for delivery.
    pub async fn submit(&self, queue: Arc<Queue>, message: Message) {
        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                error!(queue = %queue.name(), "delivery pool closed, message dropped");
                return;
            }
        };

        let fanout = Arc::clone(&self.fanout);
        tokio::spawn(async move {
            let _permit = permit;
            let result = execute_guarded("fan-out", fanout.deliver(&queue, &message)).await;
            if let PanicGuardResult::Success(report) = result {
                debug!(
                    queue = %queue.name(),
                    attempted = report.attempted,
                    delivered = report.delivered,
                    failed = report.failed,
                    "fan-out finished"
                );
            }
        });
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Fan-outs currently running
    pub fn in_flight(&self) -> usize {
        self.size - self.permits.available_permits()
    }
}
