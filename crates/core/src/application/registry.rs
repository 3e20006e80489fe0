// Queue Registry - immutable name -> queue mapping built once at startup

use super::queue::Queue;
use crate::domain::error::Result;
use crate::domain::{BrokerConfig, DomainError, QueueName};
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed set of queues known at startup.
///
/// There is no insertion or removal API; the registry is shared read-only
/// after construction. Iteration follows the configured name order.
pub struct QueueRegistry {
    queues: HashMap<QueueName, Arc<Queue>>,
    order: Vec<QueueName>,
}

impl QueueRegistry {
    pub fn from_config(config: &BrokerConfig) -> Self {
        let order: Vec<QueueName> = config
            .queue_names
            .iter()
            .map(|name| QueueName::new(name.as_str()))
            .collect();

        let queues = order
            .iter()
            .map(|name| {
                let queue = Queue::new(name.clone(), config.queue_length, config.max_subscribers);
                (name.clone(), Arc::new(queue))
            })
            .collect();

        Self { queues, order }
    }

    /// Look up a queue by name
    ///
    /// # Errors
    /// - DomainError::UnknownQueue listing the valid names
    pub fn get(&self, name: &str) -> Result<&Arc<Queue>> {
        self.queues
            .get(&QueueName::new(name))
            .ok_or_else(|| DomainError::UnknownQueue {
                name: name.to_string(),
                expected: self.names().iter().map(|n| n.to_string()).collect(),
            })
    }

    pub fn names(&self) -> &[QueueName] {
        &self.order
    }

    /// Queues in configured order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Queue>> {
        self.order.iter().filter_map(|name| self.queues.get(name))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> QueueRegistry {
        let config = BrokerConfig::new(
            vec!["orders".to_string(), "events".to_string(), "audit".to_string()],
            4,
            2,
        );
        QueueRegistry::from_config(&config)
    }

    #[test]
    fn test_lookup_known_queue() {
        let reg = registry();
        assert_eq!(reg.get("events").unwrap().name().as_str(), "events");
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_unknown_queue_lists_expected() {
        let reg = registry();
        let err = reg.get("missing").unwrap_err();

        match &err {
            DomainError::UnknownQueue { name, expected } => {
                assert_eq!(name, "missing");
                assert_eq!(expected, &vec!["orders", "events", "audit"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("orders"));
    }

    #[test]
    fn test_iteration_follows_config_order() {
        let reg = registry();
        let names: Vec<&str> = reg.iter().map(|q| q.name().as_str()).collect();
        assert_eq!(names, vec!["orders", "events", "audit"]);
    }
}
