//! The ingestion pipeline shared by all three strategies.
//!
//! One raw payload in, zero or one typed event out:
//!
//! ```text
//! raw ──► deserialize ──► dedup check ──► platform fact ──► buffer ──► on_event
//!              │                │
//!              │                └─► duplicate: DUPLICATED fact, dropped
//!              └─► failure: DESERIALIZATION_FAILED fact, on_error, dropped
//! ```
//!
//! The buffered variant feeds a strategy-owned [`EventBuffer`]; the inline
//! variant (pull) yields the event directly to the caller instead.

use crate::buffer::EventBuffer;
use crate::bus::PlatformBus;
use crate::dedup::SeenKeys;
use crate::event::Event;
use crate::payload::RawPayload;
use crate::platform::{PlatformEvent, SourceType};
use crate::source::{ErrorHandler, EventCallback, EventDeserializer};
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the pipeline needs apart from the payload itself. Built
/// once per strategy by the DSL and immutable afterwards.
pub(crate) struct Pipeline<R: 'static, T: 'static> {
    pub(crate) deserializer: Box<dyn EventDeserializer<R, T>>,
    pub(crate) bus: Arc<dyn PlatformBus>,
    pub(crate) on_event: EventCallback<T>,
    pub(crate) on_error: ErrorHandler,
    pub(crate) source_type: SourceType,
}

impl<R, T> Pipeline<R, T>
where
    R: RawPayload + 'static,
    T: Event + Clone,
{
    /// Buffered variant: deserialize, dedup, observe, buffer, notify.
    pub(crate) fn ingest(&self, raw: R, buffer: &EventBuffer<T>, seen: &SeenKeys) {
        if let Some(event) = self.deserialize_and_dedup(raw, seen) {
            buffer.push(event.clone());
            (self.on_event)(&event);
        }
    }

    /// Inline variant for pull: no shared buffer, the event is yielded to
    /// the caller immediately.
    pub(crate) fn ingest_inline(&self, raw: R, seen: &SeenKeys) -> Option<T> {
        let event = self.deserialize_and_dedup(raw, seen)?;
        (self.on_event)(&event);
        Some(event)
    }

    /// Common head of both variants: steps 1–4 plus the RECEIVED fact.
    ///
    /// The dedup check and the key insertion are one atomic test-and-set,
    /// so concurrent deliveries of the same key resolve to one winner.
    fn deserialize_and_dedup(&self, raw: R, seen: &SeenKeys) -> Option<T> {
        let event = match self.deserializer.deserialize(&raw) {
            Ok(event) => event,
            Err(err) => {
                warn!(source = %self.source_type, error = %err, "payload failed to deserialize");
                self.bus.emit(PlatformEvent::deserialization_failed(
                    raw.as_text(),
                    err.to_string(),
                    self.source_type,
                ));
                (self.on_error)(err.into());
                return None;
            }
        };

        let size = raw.size();
        let key = event.idempotency_key();
        if !seen.first_sighting(key) {
            debug!(source = %self.source_type, key, "duplicate event dropped");
            self.bus
                .emit(PlatformEvent::event_duplicated(key, self.source_type));
            return None;
        }

        self.bus
            .emit(PlatformEvent::event_received(key, self.source_type, size));
        Some(event)
    }
}
