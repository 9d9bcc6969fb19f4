//! Continuous push-stream strategy.
//!
//! The source delivers on threads it owns; the strategy wires the
//! ingestion pipeline in as the message handler and accumulates into its
//! buffer until the consumer collects. Lifecycle transitions are
//! compare-and-swap on an atomic flag, so racing `open()` calls resolve
//! deterministically to one winner and one illegal-state failure.

use crate::buffer::EventBuffer;
use crate::dedup::SeenKeys;
use crate::error::{KeruuError, Result};
use crate::event::Event;
use crate::payload::RawPayload;
use crate::pipeline::Pipeline;
use crate::platform::PlatformEvent;
use crate::source::{MessageHandler, StreamSource};
use crate::strategy::EventSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Strategy with a `Closed → Open → Closed` lifecycle.
pub struct StreamStrategy<R: 'static, T: 'static> {
    source: Box<dyn StreamSource<R>>,
    inner: Arc<Inner<R, T>>,
}

/// State shared with the message handler handed to the source.
struct Inner<R: 'static, T: 'static> {
    pipeline: Pipeline<R, T>,
    buffer: EventBuffer<T>,
    seen: SeenKeys,
    open: AtomicBool,
}

impl<R, T> StreamStrategy<R, T>
where
    R: RawPayload + Send + 'static,
    T: Event + Clone,
{
    pub(crate) fn new(
        source: Box<dyn StreamSource<R>>,
        pipeline: Pipeline<R, T>,
        buffer: EventBuffer<T>,
    ) -> Self {
        Self {
            source,
            inner: Arc::new(Inner {
                pipeline,
                buffer,
                seen: SeenKeys::new(),
                open: AtomicBool::new(false),
            }),
        }
    }
}

impl<R: 'static, T: 'static> StreamStrategy<R, T> {
    /// Close if open: stop the source, report, flip the flag.
    ///
    /// The state transition is unconditional; a failing `stop` is logged
    /// and carried on the `SourceStopped` fact, never propagated. Called
    /// from both `close()` and `Drop`.
    fn shutdown(&self) {
        if self
            .inner
            .open
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let stop_error = match self.source.stop() {
            Ok(()) => None,
            Err(err) => {
                warn!(error = %err, "stream source failed to stop");
                Some(err.to_string())
            }
        };
        self.inner.pipeline.bus.emit(PlatformEvent::source_stopped(
            self.inner.pipeline.source_type,
            stop_error,
        ));
        info!("stream source closed");
    }
}

impl<R, T> EventSource<T> for StreamStrategy<R, T>
where
    R: RawPayload + Send + 'static,
    T: Event + Clone,
{
    fn open(&self) -> Result<()> {
        if self
            .inner
            .open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(KeruuError::IllegalState("stream source is already open"));
        }

        self.inner
            .pipeline
            .bus
            .emit(PlatformEvent::source_started(self.inner.pipeline.source_type));

        // The handler re-checks the flag so that nothing new begins once
        // close() has returned; deliveries in flight may still finish.
        let inner = Arc::clone(&self.inner);
        let on_message: MessageHandler<R> = Arc::new(move |raw| {
            if !inner.open.load(Ordering::Acquire) {
                return;
            }
            inner.pipeline.ingest(raw, &inner.buffer, &inner.seen);
        });
        let on_error = Arc::clone(&self.inner.pipeline.on_error);

        if let Err(err) = self.source.start(on_message, on_error) {
            self.inner.open.store(false, Ordering::Release);
            self.inner.pipeline.bus.emit(PlatformEvent::source_stopped(
                self.inner.pipeline.source_type,
                Some(err.to_string()),
            ));
            return Err(KeruuError::Source(err));
        }

        info!("stream source opened");
        Ok(())
    }

    fn collect(&self) -> Result<Vec<T>> {
        if !self.inner.open.load(Ordering::Acquire) {
            return Err(KeruuError::IllegalState("call open() before collect()"));
        }
        Ok(self.inner.buffer.drain())
    }

    fn close(&self) -> Result<()> {
        self.shutdown();
        Ok(())
    }
}

impl<R: 'static, T: 'static> Drop for StreamStrategy<R, T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
