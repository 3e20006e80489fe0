//! Dispatcher - drains every queue and hands ready messages to fan-out
//!
//! One drain task per queue waits on that queue's buffer (no polling), so an
//! idle broker uses no CPU and a busy queue never starves the others. A drain
//! only awaits the hand-off, never the delivery itself.
//!
//! A panic in any drain aborts the sibling drains and surfaces as
//! [`AppError::DispatcherFault`], letting the supervisor restart the whole
//! dispatcher. Buffers and subscribers live in the registry, so a restart
//! resumes exactly where the faulted run stopped.

use super::panic_guard::panic_message;
use super::pool::DeliveryPool;
use super::queue::Queue;
use super::registry::QueueRegistry;
use crate::domain::Message;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Receives each drained message
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn accept(&self, queue: Arc<Queue>, message: Message);
}

#[async_trait]
impl MessageSink for DeliveryPool {
    async fn accept(&self, queue: Arc<Queue>, message: Message) {
        self.submit(queue, message).await;
    }
}

/// Background draining service
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<QueueRegistry>,
    sink: Arc<dyn MessageSink>,
}

impl Dispatcher {
    pub fn new(registry: Arc<QueueRegistry>, sink: Arc<dyn MessageSink>) -> Self {
        Self { registry, sink }
    }

    /// Drain all queues until every buffer is closed
    ///
    /// # Errors
    /// - AppError::DispatcherFault if a drain task panicked or was cancelled
    pub async fn run(self) -> Result<()> {
        let mut drains = JoinSet::new();
        for queue in self.registry.iter() {
            drains.spawn(drain(Arc::clone(queue), Arc::clone(&self.sink)));
        }
        info!(queues = self.registry.len(), "Dispatcher started");

        while let Some(joined) = drains.join_next().await {
            match joined {
                Ok(()) => {}
                Err(join_err) if join_err.is_panic() => {
                    let msg = panic_message(join_err.into_panic().as_ref());
                    drains.abort_all();
                    return Err(AppError::DispatcherFault(format!(
                        "drain task panicked: {}",
                        msg
                    )));
                }
                Err(join_err) => {
                    drains.abort_all();
                    return Err(AppError::DispatcherFault(format!(
                        "drain task cancelled: {}",
                        join_err
                    )));
                }
            }
        }

        info!("All queue buffers closed, dispatcher stopped");
        Ok(())
    }
}

async fn drain(queue: Arc<Queue>, sink: Arc<dyn MessageSink>) {
    debug!(queue = %queue.name(), "Drain started");

    while let Some(message) = queue.recv().await {
        sink.accept(Arc::clone(&queue), message).await;
    }

    warn!(queue = %queue.name(), "queue buffer closed, draining stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::supervisor::Supervisor;
    use crate::domain::{BrokerConfig, RestartPolicy};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Forwards (queue, payload) pairs; panics on the payload "poison"
    struct RecordingSink {
        tx: mpsc::UnboundedSender<(String, Vec<u8>)>,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn accept(&self, queue: Arc<Queue>, message: Message) {
            if message.bytes().as_ref() == b"poison" {
                panic!("poisoned message");
            }
            let _ = self
                .tx
                .send((queue.name().to_string(), message.bytes().to_vec()));
        }
    }

    type Drained = mpsc::UnboundedReceiver<(String, Vec<u8>)>;

    fn setup(names: &[&str]) -> (Arc<QueueRegistry>, Dispatcher, Drained) {
        let config = BrokerConfig::new(names.iter().map(|n| n.to_string()).collect(), 4, 1);
        let registry = Arc::new(QueueRegistry::from_config(&config));
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::new(RecordingSink { tx }));
        (registry, dispatcher, rx)
    }

    async fn next(rx: &mut Drained) -> (String, Vec<u8>) {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for drained message")
            .expect("sink channel closed")
    }

    #[tokio::test]
    async fn test_drains_fifo_per_queue() {
        let (registry, dispatcher, mut rx) = setup(&["orders"]);
        let queue = registry.get("orders").unwrap();
        queue.try_push(Message::from("a")).unwrap();
        queue.try_push(Message::from("b")).unwrap();

        let handle = tokio::spawn(dispatcher.run());

        assert_eq!(next(&mut rx).await.1, b"a".to_vec());
        assert_eq!(next(&mut rx).await.1, b"b".to_vec());
        handle.abort();
    }

    #[tokio::test]
    async fn test_drains_every_queue() {
        let (registry, dispatcher, mut rx) = setup(&["orders", "events"]);
        let handle = tokio::spawn(dispatcher.run());

        registry.get("events").unwrap().try_push(Message::from("e")).unwrap();
        registry.get("orders").unwrap().try_push(Message::from("o")).unwrap();

        let mut seen = vec![next(&mut rx).await.0, next(&mut rx).await.0];
        seen.sort();
        assert_eq!(seen, vec!["events", "orders"]);
        handle.abort();
    }

    #[tokio::test]
    async fn test_closed_queue_does_not_stop_others() {
        let (registry, dispatcher, mut rx) = setup(&["orders", "events"]);
        // closed before the run starts: the drain would otherwise hold the receiver
        registry.get("orders").unwrap().close().await;

        let handle = tokio::spawn(dispatcher.run());
        tokio::time::sleep(Duration::from_millis(20)).await;

        registry.get("events").unwrap().try_push(Message::from("e")).unwrap();
        assert_eq!(next(&mut rx).await, ("events".to_string(), b"e".to_vec()));
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_all_closed_ends_run() {
        let (registry, dispatcher, _rx) = setup(&["orders"]);
        registry.get("orders").unwrap().close().await;

        let result = tokio::time::timeout(Duration::from_secs(1), dispatcher.run()).await;
        assert!(matches!(result, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_drain_panic_is_a_fault() {
        let (registry, dispatcher, _rx) = setup(&["orders"]);
        registry.get("orders").unwrap().try_push(Message::from("poison")).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), dispatcher.run())
            .await
            .unwrap();

        match result {
            Err(AppError::DispatcherFault(msg)) => assert!(msg.contains("poisoned message")),
            other => panic!("expected dispatcher fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_supervised_dispatcher_recovers_after_fault() {
        let (registry, dispatcher, mut rx) = setup(&["orders", "events"]);
        let supervisor = Supervisor::spawn("dispatcher", RestartPolicy::immediate(), move || {
            dispatcher.clone().run()
        });

        registry.get("orders").unwrap().try_push(Message::from("poison")).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        registry.get("orders").unwrap().try_push(Message::from("after")).unwrap();
        registry.get("events").unwrap().try_push(Message::from("other")).unwrap();

        let mut seen = vec![next(&mut rx).await.1, next(&mut rx).await.1];
        seen.sort();
        assert_eq!(seen, vec![b"after".to_vec(), b"other".to_vec()]);
        assert!(supervisor.restarts() >= 1);
    }
}
