//! Capability trait for raw payloads entering a pipeline.
//!
//! The pipeline needs exactly two things from a raw payload: its size for
//! the `EventReceived` platform fact, and a textual rendering for the
//! `EventDeserializationFailed` one. Common wire types implement it out
//! of the box; custom record types implement it in a few lines.

use bytes::Bytes;
use std::borrow::Cow;

/// What the ingestion pipeline observes about a raw payload.
pub trait RawPayload {
    /// Payload size: byte length for binary payloads, character count for
    /// textual ones.
    fn size(&self) -> usize;

    /// Text rendering used when reporting a deserialization failure.
    fn as_text(&self) -> Cow<'_, str>;
}

impl RawPayload for String {
    fn size(&self) -> usize {
        self.chars().count()
    }

    fn as_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl RawPayload for &str {
    fn size(&self) -> usize {
        self.chars().count()
    }

    fn as_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl RawPayload for Vec<u8> {
    fn size(&self) -> usize {
        self.len()
    }

    fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self)
    }
}

impl RawPayload for &[u8] {
    fn size(&self) -> usize {
        self.len()
    }

    fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self)
    }
}

impl RawPayload for Bytes {
    fn size(&self) -> usize {
        self.len()
    }

    fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self)
    }
}
