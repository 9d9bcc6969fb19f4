//! Staged construction protocol for strategies.
//!
//! Building happens in fixed stages, each stage a distinct type exposing
//! only the methods valid at that point:
//!
//! ```text
//! pull(source) ─┐
//! stream(source)┼─► source step ──► deserialize_with ──► builder ──► build()
//! webhook()  ───┘      │                                   │
//!                      └─ with_platform_bus (optional)     ├─ on_event (optional)
//!                                                          └─ on_error (optional)
//! ```
//!
//! A deserializer must be supplied before `build()` is reachable; the bus
//! and callbacks default to no-ops. Every step consumes `self`, so a
//! builder cannot be reused and a built strategy cannot be reconfigured.
//!
//! ```ignore
//! let strategy = keruu::stream(KafkaOccupancySource::connect(brokers)?)
//!     .with_platform_bus(TracingBus)
//!     .deserialize_with(occupancy_mapper)
//!     .on_event(|event| metrics.mark(event))
//!     .build();
//!
//! strategy.open()?;
//! let events = strategy.collect()?;
//! ```

use crate::buffer::EventBuffer;
use crate::bus::{NoopBus, PlatformBus};
use crate::error::KeruuError;
use crate::event::Event;
use crate::payload::RawPayload;
use crate::pipeline::Pipeline;
use crate::platform::SourceType;
use crate::source::{
    ErrorHandler, EventCallback, EventDeserializer, FetchSource, StreamSource,
};
use crate::strategy::{PullStrategy, StreamStrategy, WebhookStrategy};
use std::marker::PhantomData;
use std::sync::Arc;

/// Begin building a pull strategy around an on-demand source.
pub fn pull<R, S>(source: S) -> PullSourceStep<R>
where
    R: 'static,
    S: FetchSource<R> + 'static,
{
    PullSourceStep {
        source: Box::new(source),
        bus: Arc::new(NoopBus),
    }
}

/// Begin building a stream strategy around a continuous push source.
pub fn stream<R, S>(source: S) -> StreamSourceStep<R>
where
    R: 'static,
    S: StreamSource<R> + 'static,
{
    StreamSourceStep {
        source: Box::new(source),
        bus: Arc::new(NoopBus),
    }
}

/// Begin building a webhook strategy; payloads arrive via `receive`.
pub fn webhook<R: 'static>() -> WebhookSourceStep<R> {
    WebhookSourceStep {
        bus: Arc::new(NoopBus),
        _raw: PhantomData,
    }
}

/// First stage of a pull build: source supplied, deserializer pending.
pub struct PullSourceStep<R: 'static> {
    source: Box<dyn FetchSource<R>>,
    bus: Arc<dyn PlatformBus>,
}

impl<R: 'static> PullSourceStep<R> {
    pub fn with_platform_bus(mut self, bus: impl PlatformBus + 'static) -> Self {
        self.bus = Arc::new(bus);
        self
    }

    pub fn deserialize_with<T, D>(self, deserializer: D) -> PullBuilder<R, T>
    where
        T: 'static,
        D: EventDeserializer<R, T> + 'static,
    {
        PullBuilder {
            source: self.source,
            common: CommonBuilder::new(self.bus, Box::new(deserializer), SourceType::Pull),
        }
    }
}

/// First stage of a stream build.
pub struct StreamSourceStep<R: 'static> {
    source: Box<dyn StreamSource<R>>,
    bus: Arc<dyn PlatformBus>,
}

impl<R: 'static> StreamSourceStep<R> {
    pub fn with_platform_bus(mut self, bus: impl PlatformBus + 'static) -> Self {
        self.bus = Arc::new(bus);
        self
    }

    pub fn deserialize_with<T, D>(self, deserializer: D) -> StreamBuilder<R, T>
    where
        T: 'static,
        D: EventDeserializer<R, T> + 'static,
    {
        StreamBuilder {
            source: self.source,
            common: CommonBuilder::new(self.bus, Box::new(deserializer), SourceType::Stream),
            watermark: None,
        }
    }
}

/// First stage of a webhook build.
pub struct WebhookSourceStep<R: 'static> {
    bus: Arc<dyn PlatformBus>,
    _raw: PhantomData<fn(R)>,
}

impl<R: 'static> WebhookSourceStep<R> {
    pub fn with_platform_bus(mut self, bus: impl PlatformBus + 'static) -> Self {
        self.bus = Arc::new(bus);
        self
    }

    pub fn deserialize_with<T, D>(self, deserializer: D) -> WebhookBuilder<R, T>
    where
        T: 'static,
        D: EventDeserializer<R, T> + 'static,
    {
        WebhookBuilder {
            common: CommonBuilder::new(self.bus, Box::new(deserializer), SourceType::Webhook),
            watermark: None,
        }
    }
}

/// Pipeline configuration shared by all three builders.
struct CommonBuilder<R: 'static, T: 'static> {
    bus: Arc<dyn PlatformBus>,
    deserializer: Box<dyn EventDeserializer<R, T>>,
    on_event: EventCallback<T>,
    on_error: ErrorHandler,
    source_type: SourceType,
}

impl<R: 'static, T: 'static> CommonBuilder<R, T> {
    fn new(
        bus: Arc<dyn PlatformBus>,
        deserializer: Box<dyn EventDeserializer<R, T>>,
        source_type: SourceType,
    ) -> Self {
        Self {
            bus,
            deserializer,
            on_event: Arc::new(|_| {}),
            on_error: Arc::new(|_| {}),
            source_type,
        }
    }

    fn into_pipeline(self) -> Pipeline<R, T> {
        Pipeline {
            deserializer: self.deserializer,
            bus: self.bus,
            on_event: self.on_event,
            on_error: self.on_error,
            source_type: self.source_type,
        }
    }
}

/// Final stage of a pull build: callbacks optional, then `build()`.
pub struct PullBuilder<R: 'static, T: 'static> {
    source: Box<dyn FetchSource<R>>,
    common: CommonBuilder<R, T>,
}

impl<R, T> PullBuilder<R, T>
where
    R: RawPayload + Send + 'static,
    T: Event + Clone,
{
    pub fn on_event(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.common.on_event = Arc::new(callback);
        self
    }

    pub fn on_error(mut self, callback: impl Fn(KeruuError) + Send + Sync + 'static) -> Self {
        self.common.on_error = Arc::new(callback);
        self
    }

    pub fn build(self) -> PullStrategy<R, T> {
        PullStrategy::new(self.source, self.common.into_pipeline())
    }
}

/// Final stage of a stream build.
pub struct StreamBuilder<R: 'static, T: 'static> {
    source: Box<dyn StreamSource<R>>,
    common: CommonBuilder<R, T>,
    watermark: Option<usize>,
}

impl<R, T> StreamBuilder<R, T>
where
    R: RawPayload + Send + 'static,
    T: Event + Clone,
{
    pub fn on_event(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.common.on_event = Arc::new(callback);
        self
    }

    pub fn on_error(mut self, callback: impl Fn(KeruuError) + Send + Sync + 'static) -> Self {
        self.common.on_error = Arc::new(callback);
        self
    }

    /// Log a warning when the buffer length crosses `mark`.
    pub fn buffer_watermark(mut self, mark: usize) -> Self {
        self.watermark = Some(mark);
        self
    }

    pub fn build(self) -> StreamStrategy<R, T> {
        StreamStrategy::new(
            self.source,
            self.common.into_pipeline(),
            EventBuffer::with_watermark(self.watermark),
        )
    }
}

/// Final stage of a webhook build.
pub struct WebhookBuilder<R: 'static, T: 'static> {
    common: CommonBuilder<R, T>,
    watermark: Option<usize>,
}

impl<R, T> WebhookBuilder<R, T>
where
    R: RawPayload + Send + 'static,
    T: Event + Clone,
{
    pub fn on_event(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.common.on_event = Arc::new(callback);
        self
    }

    pub fn on_error(mut self, callback: impl Fn(KeruuError) + Send + Sync + 'static) -> Self {
        self.common.on_error = Arc::new(callback);
        self
    }

    /// Log a warning when the buffer length crosses `mark`.
    pub fn buffer_watermark(mut self, mark: usize) -> Self {
        self.watermark = Some(mark);
        self
    }

    pub fn build(self) -> WebhookStrategy<R, T> {
        WebhookStrategy::new(
            self.common.into_pipeline(),
            EventBuffer::with_watermark(self.watermark),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::bus::RecordingBus;
    use crate::error::DeserializeError;
    use crate::event::{EventCategory, SchemaVersion};
    use crate::source::EventInbox;
    use crate::strategy::EventSource;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone)]
    struct NoteEvent {
        key: String,
        occurred_at: DateTime<Utc>,
        version: SchemaVersion,
    }

    impl Event for NoteEvent {
        fn id(&self) -> &str {
            &self.key
        }
        fn correlation_id(&self) -> &str {
            &self.key
        }
        fn idempotency_key(&self) -> &str {
            &self.key
        }
        fn category(&self) -> EventCategory {
            EventCategory::Domain
        }
        fn event_type(&self) -> &str {
            "test.note"
        }
        fn occurred_at(&self) -> DateTime<Utc> {
            self.occurred_at
        }
        fn schema_version(&self) -> &SchemaVersion {
            &self.version
        }
    }

    fn note_mapper(raw: &String) -> Result<NoteEvent, DeserializeError> {
        if raw.is_empty() {
            return Err(DeserializeError::new("empty payload"));
        }
        Ok(NoteEvent {
            key: raw.clone(),
            occurred_at: Utc::now(),
            version: SchemaVersion::new("1.0.0").unwrap(),
        })
    }

    #[test]
    fn test_pull_chain_builds_working_strategy() {
        let source = || -> Result<Vec<String>, crate::SourceError> {
            Ok(vec!["a".to_string(), "b".to_string()])
        };
        let strategy = pull(source).deserialize_with(note_mapper).build();

        let events = strategy.collect().unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_webhook_chain_with_bus_and_callbacks() {
        let bus = RecordingBus::new();
        let strategy = webhook::<String>()
            .with_platform_bus(bus.clone())
            .deserialize_with(note_mapper)
            .on_event(|_event: &NoteEvent| {})
            .on_error(|_error| {})
            .build();

        strategy.receive("a".to_string());
        assert_eq!(strategy.collect().unwrap().len(), 1);
        assert_eq!(bus.count_of("RECEIVED"), 1);
    }

    #[test]
    fn test_defaults_are_noop() {
        // no bus, no callbacks: a malformed payload is still just dropped
        let strategy = webhook::<String>().deserialize_with(note_mapper).build();

        strategy.receive(String::new());
        strategy.receive("ok".to_string());

        let events = strategy.collect().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, "ok");
    }

    #[test]
    fn test_watermark_option_is_accepted() {
        let strategy = webhook::<String>()
            .deserialize_with(note_mapper)
            .buffer_watermark(1)
            .build();

        strategy.receive("a".to_string());
        strategy.receive("b".to_string());
        assert_eq!(strategy.collect().unwrap().len(), 2);
    }
}
