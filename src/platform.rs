//! Operational events emitted by the ingestion layer itself.
//!
//! Platform events are the side channel next to the domain stream: they
//! describe lifecycle facts (a source started or stopped) and per-payload
//! outcomes (received, duplicated, failed to deserialize). They flow
//! through a [`crate::bus::PlatformBus`], never through the event buffer.

use chrono::{DateTime, Utc};
use std::fmt;

/// Which of the three delivery models produced a platform event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    /// On-demand pull: each fetch reads the source from scratch.
    Pull,
    /// Continuous push stream delivering on source-owned threads.
    Stream,
    /// Externally-pushed webhook, always ready to receive.
    Webhook,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Pull => f.write_str("pull"),
            SourceType::Stream => f.write_str("stream"),
            SourceType::Webhook => f.write_str("webhook"),
        }
    }
}

/// Closed set of operational facts emitted during ingestion.
///
/// Every variant carries the producing [`SourceType`] and an emission
/// timestamp; the uniform accessors below expose the rest of the shared
/// shape (optional correlation id, optional error message).
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// A strategy transitioned to active. Emitted once per `open()`,
    /// and once per `fetch()` for the stateless pull strategy.
    SourceStarted {
        source_type: SourceType,
        timestamp: DateTime<Utc>,
    },
    /// A strategy was closed. Carries the stop error, if any.
    SourceStopped {
        source_type: SourceType,
        timestamp: DateTime<Utc>,
        error: Option<String>,
    },
    /// A payload deserialized successfully and was not a duplicate.
    EventReceived {
        correlation_id: String,
        source_type: SourceType,
        timestamp: DateTime<Utc>,
        /// Bytes for binary payloads, characters for textual ones.
        payload_size: usize,
    },
    /// A payload's idempotency key had already been seen; it was dropped.
    EventDuplicated {
        correlation_id: String,
        source_type: SourceType,
        timestamp: DateTime<Utc>,
    },
    /// A payload failed to deserialize and was dropped.
    EventDeserializationFailed {
        raw_payload: String,
        error: String,
        source_type: SourceType,
        timestamp: DateTime<Utc>,
    },
}

impl PlatformEvent {
    pub fn source_started(source_type: SourceType) -> Self {
        PlatformEvent::SourceStarted {
            source_type,
            timestamp: Utc::now(),
        }
    }

    pub fn source_stopped(source_type: SourceType, error: Option<String>) -> Self {
        PlatformEvent::SourceStopped {
            source_type,
            timestamp: Utc::now(),
            error,
        }
    }

    pub fn event_received(
        correlation_id: impl Into<String>,
        source_type: SourceType,
        payload_size: usize,
    ) -> Self {
        PlatformEvent::EventReceived {
            correlation_id: correlation_id.into(),
            source_type,
            timestamp: Utc::now(),
            payload_size,
        }
    }

    pub fn event_duplicated(correlation_id: impl Into<String>, source_type: SourceType) -> Self {
        PlatformEvent::EventDuplicated {
            correlation_id: correlation_id.into(),
            source_type,
            timestamp: Utc::now(),
        }
    }

    pub fn deserialization_failed(
        raw_payload: impl Into<String>,
        error: impl Into<String>,
        source_type: SourceType,
    ) -> Self {
        PlatformEvent::EventDeserializationFailed {
            raw_payload: raw_payload.into(),
            error: error.into(),
            source_type,
            timestamp: Utc::now(),
        }
    }

    /// Tag identifying the variant, stable across releases.
    pub fn event_type(&self) -> &'static str {
        match self {
            PlatformEvent::SourceStarted { .. } => "SOURCE_STARTED",
            PlatformEvent::SourceStopped { .. } => "SOURCE_STOPPED",
            PlatformEvent::EventReceived { .. } => "RECEIVED",
            PlatformEvent::EventDuplicated { .. } => "DUPLICATED",
            PlatformEvent::EventDeserializationFailed { .. } => "DESERIALIZATION_FAILED",
        }
    }

    /// Correlation id of the payload this fact is about, where one exists.
    ///
    /// Per-payload facts are correlated by the payload's idempotency key;
    /// lifecycle facts have no correlation.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            PlatformEvent::EventReceived { correlation_id, .. }
            | PlatformEvent::EventDuplicated { correlation_id, .. } => Some(correlation_id),
            _ => None,
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            PlatformEvent::SourceStarted { source_type, .. }
            | PlatformEvent::SourceStopped { source_type, .. }
            | PlatformEvent::EventReceived { source_type, .. }
            | PlatformEvent::EventDuplicated { source_type, .. }
            | PlatformEvent::EventDeserializationFailed { source_type, .. } => *source_type,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PlatformEvent::SourceStarted { timestamp, .. }
            | PlatformEvent::SourceStopped { timestamp, .. }
            | PlatformEvent::EventReceived { timestamp, .. }
            | PlatformEvent::EventDuplicated { timestamp, .. }
            | PlatformEvent::EventDeserializationFailed { timestamp, .. } => *timestamp,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PlatformEvent::SourceStopped { error, .. } => error.as_deref(),
            PlatformEvent::EventDeserializationFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}
