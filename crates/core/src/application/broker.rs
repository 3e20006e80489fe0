// Broker Facade - Push / Subscribe surface and owner of the dispatcher

use super::dispatcher::Dispatcher;
use super::fanout::FanOut;
use super::pool::DeliveryPool;
use super::registry::QueueRegistry;
use super::supervisor::Supervisor;
use crate::domain::error::Result;
use crate::domain::{BrokerConfig, CallbackUrl, Message, QueueStats};
use crate::port::CallbackSender;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const DISPATCHER_TASK: &str = "dispatcher";

/// Broker-wide statistics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct BrokerStats {
    pub queues: Vec<QueueStats>,
    pub deliveries_in_flight: usize,
    pub delivery_workers: usize,
    pub dispatcher_restarts: u32,
}

/// In-process message relay.
///
/// Owns the queue registry and exactly one supervised dispatcher. Delivery is
/// best-effort and at-most-once: a successful `push` only means the message
/// was buffered. There is no explicit shutdown; dropping the broker stops the
/// dispatcher.
pub struct Broker {
    registry: Arc<QueueRegistry>,
    pool: DeliveryPool,
    dispatcher: Supervisor,
}

impl Broker {
    /// Validate `config`, build the queues and start the dispatcher
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - DomainError::InvalidConfig if `config` fails validation
    pub fn start(config: BrokerConfig, sender: Arc<dyn CallbackSender>) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(QueueRegistry::from_config(&config));
        let fanout = Arc::new(FanOut::new(sender, config.callback_timeout));
        let pool = DeliveryPool::new(config.delivery_workers, fanout);

        let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::new(pool.clone()));
        let supervisor = Supervisor::spawn(DISPATCHER_TASK, config.restart, move || {
            dispatcher.clone().run()
        });

        info!(
            queues = ?config.queue_names,
            queue_length = config.queue_length,
            max_subscribers = config.max_subscribers,
            callback_timeout_ms = config.callback_timeout.as_millis() as u64,
            delivery_workers = config.delivery_workers,
            "Broker started"
        );

        Ok(Self {
            registry,
            pool,
            dispatcher: supervisor,
        })
    }

    /// Buffer `payload` on `queue_name` without blocking
    ///
    /// # Errors
    /// - DomainError::UnknownQueue if the name is not configured
    /// - DomainError::QueueOverflow if the buffer is full (the message is not kept)
    pub fn push(&self, queue_name: &str, payload: impl Into<Message>) -> Result<()> {
        let queue = self.registry.get(queue_name).inspect_err(|_| {
            warn!(name = queue_name, expected = ?self.registry.names(), "invalid queue name");
        })?;
        queue.try_push(payload.into())
    }

    /// Register `callback` to receive every message drained from `queue_name`
    ///
    /// The address is not validated here; an unusable callback only shows up
    /// as a logged delivery failure.
    ///
    /// # Errors
    /// - DomainError::UnknownQueue if the name is not configured
    /// - DomainError::SubscriberOverflow if the subscriber list is full
    pub async fn subscribe(
        &self,
        queue_name: &str,
        callback: impl Into<CallbackUrl>,
    ) -> Result<()> {
        let queue = self.registry.get(queue_name).inspect_err(|_| {
            warn!(name = queue_name, expected = ?self.registry.names(), "invalid queue name");
        })?;
        queue.subscribe(callback.into()).await
    }

    /// Configured queue names, in configuration order
    pub fn queue_names(&self) -> Vec<String> {
        self.registry.names().iter().map(|n| n.to_string()).collect()
    }

    pub async fn stats(&self) -> BrokerStats {
        let mut queues = Vec::with_capacity(self.registry.len());
        for queue in self.registry.iter() {
            queues.push(queue.stats().await);
        }

        BrokerStats {
            queues,
            deliveries_in_flight: self.pool.in_flight(),
            delivery_workers: self.pool.size(),
            dispatcher_restarts: self.dispatcher.restarts(),
        }
    }
}
