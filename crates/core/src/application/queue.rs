// Queue - bounded message buffer plus bounded subscriber list

use crate::domain::error::Result;
use crate::domain::{CallbackUrl, DomainError, Message, QueueName, QueueStats};
use tokio::sync::{mpsc, Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, warn};

/// A single named queue.
///
/// The buffer is a bounded channel: producers never block, a full buffer
/// rejects the write. The receiving half lives inside the queue so that a
/// restarted dispatcher keeps draining the same buffer.
#[derive(Debug)]
pub struct Queue {
    name: QueueName,
    capacity: usize,
    max_subscribers: usize,
    tx: mpsc::Sender<Message>,
    rx: Mutex<mpsc::Receiver<Message>>,
    subscribers: RwLock<Vec<CallbackUrl>>,
}

impl Queue {
    pub fn new(name: QueueName, capacity: usize, max_subscribers: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            name,
            capacity,
            max_subscribers,
            tx,
            rx: Mutex::new(rx),
            subscribers: RwLock::new(Vec::with_capacity(max_subscribers)),
        }
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    /// Non-blocking enqueue
    ///
    /// # Errors
    /// - DomainError::QueueOverflow if the buffer holds `capacity` messages
    pub fn try_push(&self, message: Message) -> Result<()> {
        match self.tx.try_send(message) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(queue = %self.name, queue_length = self.capacity, "queue overflow");
                Err(DomainError::QueueOverflow {
                    name: self.name.to_string(),
                    capacity: self.capacity,
                })
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // Buffer closed: nothing will ever drain it, treat as full
                warn!(queue = %self.name, "push to closed queue buffer");
                Err(DomainError::QueueOverflow {
                    name: self.name.to_string(),
                    capacity: self.capacity,
                })
            }
        }
    }

    /// Wait for the next message (FIFO)
    ///
    /// Returns `None` once the buffer is closed and drained.
    pub async fn recv(&self) -> Option<Message> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Append a subscriber under exclusive access
    ///
    /// # Errors
    /// - DomainError::SubscriberOverflow if `max_subscribers` is reached
    pub async fn subscribe(&self, callback: CallbackUrl) -> Result<()> {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.len() >= self.max_subscribers {
            warn!(
                queue = %self.name,
                max_subscribers = self.max_subscribers,
                "subscribers overflow"
            );
            return Err(DomainError::SubscriberOverflow {
                name: self.name.to_string(),
                max_subscribers: self.max_subscribers,
            });
        }

        debug!(queue = %self.name, callback = %callback, "subscriber added");
        subscribers.push(callback);
        Ok(())
    }

    /// Shared read access to the subscriber list for one delivery pass
    pub async fn subscribers(&self) -> RwLockReadGuard<'_, Vec<CallbackUrl>> {
        self.subscribers.read().await
    }

    pub async fn stats(&self) -> QueueStats {
        let subscribers = self.subscribers.read().await.len();
        QueueStats {
            name: self.name.clone(),
            pending: self.pending(),
            capacity: self.capacity,
            subscribers,
            max_subscribers: self.max_subscribers,
        }
    }

    /// Messages currently buffered
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Stop accepting messages; buffered ones can still be drained
    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.rx.lock().await.close();
    }
}
