//! Sink for platform events.
//!
//! Strategies report operational facts through a [`PlatformBus`]. The
//! default is [`NoopBus`]; [`TracingBus`] forwards facts to `tracing`,
//! and [`RecordingBus`] captures them for assertions in tests.

use crate::platform::PlatformEvent;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives every platform event a strategy emits.
///
/// Implementations must not block the calling pipeline for long periods:
/// `emit` runs inline on producer threads. Failures inside a bus must be
/// handled by the bus itself; they cannot abort ingestion.
pub trait PlatformBus: Send + Sync {
    fn emit(&self, event: PlatformEvent);
}

/// Closures are buses. Useful for one-off wiring:
///
/// ```
/// use keruu::{PlatformBus, PlatformEvent, SourceType};
///
/// let bus = |event: PlatformEvent| println!("{}", event.event_type());
/// bus.emit(PlatformEvent::source_started(SourceType::Pull));
/// ```
impl<F> PlatformBus for F
where
    F: Fn(PlatformEvent) + Send + Sync,
{
    fn emit(&self, event: PlatformEvent) {
        self(event)
    }
}

/// Discards every platform event. The default bus.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBus;

impl PlatformBus for NoopBus {
    fn emit(&self, _event: PlatformEvent) {}
}

/// Forwards platform events to `tracing` with a severity matching the fact.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBus;

impl PlatformBus for TracingBus {
    fn emit(&self, event: PlatformEvent) {
        let source = event.source_type();
        match &event {
            PlatformEvent::SourceStarted { .. } => info!(%source, "source started"),
            PlatformEvent::SourceStopped { error, .. } => match error {
                Some(error) => warn!(%source, %error, "source stopped with error"),
                None => info!(%source, "source stopped"),
            },
            PlatformEvent::EventReceived {
                correlation_id,
                payload_size,
                ..
            } => {
                debug!(%source, correlation_id = %correlation_id, payload_size = *payload_size, "event received")
            }
            PlatformEvent::EventDuplicated { correlation_id, .. } => {
                debug!(%source, correlation_id = %correlation_id, "duplicate event dropped")
            }
            PlatformEvent::EventDeserializationFailed { error, .. } => {
                warn!(%source, %error, "payload failed to deserialize")
            }
        }
    }
}

/// Captures emitted events in memory. Useful for testing.
///
/// Clones share the same storage, so a test can keep one handle and hand
/// another to a strategy builder.
#[derive(Debug, Default, Clone)]
pub struct RecordingBus {
    events: Arc<Mutex<Vec<PlatformEvent>>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn events(&self) -> Vec<PlatformEvent> {
        self.events.lock().clone()
    }

    /// Number of captured events whose tag matches `event_type`.
    pub fn count_of(&self, event_type: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.event_type() == event_type)
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl PlatformBus for RecordingBus {
    fn emit(&self, event: PlatformEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::platform::SourceType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_noop_bus_discards() {
        NoopBus.emit(PlatformEvent::source_started(SourceType::Pull));
    }

    #[test]
    fn test_closure_bus() {
        static SEEN: AtomicUsize = AtomicUsize::new(0);
        let bus = |_event: PlatformEvent| {
            SEEN.fetch_add(1, Ordering::Relaxed);
        };
        bus.emit(PlatformEvent::source_started(SourceType::Stream));
        bus.emit(PlatformEvent::source_stopped(SourceType::Stream, None));
        assert_eq!(SEEN.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_recording_bus_shares_storage_across_clones() {
        let bus = RecordingBus::new();
        let handle = bus.clone();

        handle.emit(PlatformEvent::event_received("a", SourceType::Webhook, 3));
        handle.emit(PlatformEvent::event_duplicated("a", SourceType::Webhook));

        assert_eq!(bus.len(), 2);
        assert_eq!(bus.count_of("RECEIVED"), 1);
        assert_eq!(bus.count_of("DUPLICATED"), 1);
        assert_eq!(bus.events()[0].correlation_id(), Some("a"));
    }
}
