// Relay Infrastructure - HTTP Adapters
// Implements: CallbackSender

pub mod http_sender;

pub use http_sender::HttpCallbackSender;
