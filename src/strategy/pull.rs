//! On-demand pull strategy.

use crate::dedup::SeenKeys;
use crate::error::{KeruuError, Result};
use crate::event::Event;
use crate::payload::RawPayload;
use crate::pipeline::Pipeline;
use crate::platform::PlatformEvent;
use crate::source::FetchSource;
use crate::strategy::EventSource;

/// Strategy that reads its source from scratch on every fetch.
///
/// No state persists between calls: no shared buffer, no long-lived
/// seen-key set, no open/close lifecycle. Duplicate keys are detected
/// within a single fetch only.
pub struct PullStrategy<R: 'static, T: 'static> {
    source: Box<dyn FetchSource<R>>,
    pipeline: Pipeline<R, T>,
}

impl<R, T> PullStrategy<R, T>
where
    R: RawPayload + 'static,
    T: Event + Clone,
{
    pub(crate) fn new(source: Box<dyn FetchSource<R>>, pipeline: Pipeline<R, T>) -> Self {
        Self { source, pipeline }
    }

    /// Read the source once and lazily map each raw payload through the
    /// inline pipeline.
    ///
    /// A failed `read` aborts the batch and propagates wrapped; per-item
    /// deserialization failures only drop that item. Results are never
    /// cached: two fetches against a changing source see different data.
    pub fn fetch(&self) -> Result<impl Iterator<Item = T> + '_> {
        self.pipeline
            .bus
            .emit(PlatformEvent::source_started(self.pipeline.source_type));

        let batch = self.source.read().map_err(KeruuError::Source)?;

        let seen = SeenKeys::new();
        let pipeline = &self.pipeline;
        Ok(batch
            .into_iter()
            .filter_map(move |raw| pipeline.ingest_inline(raw, &seen)))
    }
}

impl<R, T> EventSource<T> for PullStrategy<R, T>
where
    R: RawPayload + Send + 'static,
    T: Event + Clone,
{
    fn collect(&self) -> Result<Vec<T>> {
        Ok(self.fetch()?.collect())
    }
}
