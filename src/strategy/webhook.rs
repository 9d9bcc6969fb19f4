//! Externally-pushed webhook strategy.

use crate::buffer::EventBuffer;
use crate::dedup::SeenKeys;
use crate::error::Result;
use crate::event::Event;
use crate::payload::RawPayload;
use crate::pipeline::Pipeline;
use crate::source::EventInbox;
use crate::strategy::EventSource;

/// Strategy that is always ready to receive.
///
/// An external transport (typically an HTTP handler) calls
/// [`receive`](EventInbox::receive) once per inbound payload; the
/// pipeline runs synchronously on that calling thread and never lets a
/// deserialization failure escape back to the transport; failures go to
/// the configured error callback instead.
pub struct WebhookStrategy<R: 'static, T: 'static> {
    pipeline: Pipeline<R, T>,
    buffer: EventBuffer<T>,
    seen: SeenKeys,
}

impl<R, T> WebhookStrategy<R, T>
where
    R: RawPayload + 'static,
    T: Event + Clone,
{
    pub(crate) fn new(pipeline: Pipeline<R, T>, buffer: EventBuffer<T>) -> Self {
        Self {
            pipeline,
            buffer,
            seen: SeenKeys::new(),
        }
    }
}

impl<R, T> EventInbox<R> for WebhookStrategy<R, T>
where
    R: RawPayload + 'static,
    T: Event + Clone,
{
    fn receive(&self, raw: R) {
        self.pipeline.ingest(raw, &self.buffer, &self.seen);
    }
}

impl<R, T> EventSource<T> for WebhookStrategy<R, T>
where
    R: RawPayload + Send + 'static,
    T: Event + Clone,
{
    fn collect(&self) -> Result<Vec<T>> {
        Ok(self.buffer.drain())
    }
}
