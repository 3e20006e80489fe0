// Application Layer - Queueing, dispatch and delivery services

pub mod broker;
pub mod dispatcher;
pub mod fanout;
pub mod panic_guard;
pub mod pool;
pub mod queue;
pub mod registry;
pub mod supervisor;


// Re-exports
pub use broker::{Broker, BrokerStats};
pub use dispatcher::{Dispatcher, MessageSink};
pub use fanout::{FanOut, FanOutReport};
pub use panic_guard::{execute_guarded, PanicGuardResult};
pub use pool::DeliveryPool;
pub use queue::Queue;
pub use registry::QueueRegistry;
pub use supervisor::Supervisor;
