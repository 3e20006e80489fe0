// Relay Core - Queueing, Dispatch & Fan-out
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{Broker, BrokerStats};
pub use domain::{BrokerConfig, CallbackUrl, DomainError, Message, QueueName};
pub use error::{AppError, Result};
