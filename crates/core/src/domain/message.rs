// Message & Subscriber Domain Models

use bytes::Bytes;
use serde::Serialize;
use std::fmt;

/// Opaque message payload.
///
/// The broker never inspects, parses or annotates the bytes; they are
/// forwarded verbatim as the body of every delivery request. Cloning is
/// a reference-count bump, so one message can be shared by many fan-out tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(Bytes);

impl Message {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self(payload.into())
    }

    pub fn bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Message {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

impl From<&'static str> for Message {
    fn from(payload: &'static str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for Message {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

/// Callback endpoint address of a subscriber.
///
/// Stored as given: format and reachability are only discovered when a
/// delivery is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CallbackUrl(String);

impl CallbackUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallbackUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for CallbackUrl {
    fn from(url: String) -> Self {
        Self(url)
    }
}
