// Port Layer - Interfaces for external dependencies

pub mod callback_sender;

// Re-exports
pub use callback_sender::{CallbackSender, DeliveryError, DeliveryReceipt};
