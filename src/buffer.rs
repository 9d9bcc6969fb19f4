//! Lock-free accumulation buffer between ingestion and collection.
//!
//! Producers push from whatever thread a source delivers on; the consumer
//! drains the whole backlog as one ordered snapshot. Pushes racing an
//! in-progress drain land in that drain or the next one, never lost and
//! never delivered twice.

use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Unbounded concurrent FIFO owned by exactly one strategy instance.
///
/// The buffer is unbounded by design; deployments that need bounds impose
/// them externally. An optional watermark logs a warning when the live
/// length crosses it, as an early signal of a consumer falling behind.
pub struct EventBuffer<T> {
    queue: SegQueue<T>,
    metrics: BufferMetrics,
    watermark: Option<usize>,
}

/// Counters for buffer monitoring.
#[derive(Debug, Default)]
pub struct BufferMetrics {
    /// Total events pushed
    pushed: AtomicU64,
    /// Total events drained
    drained: AtomicU64,
}

impl<T> EventBuffer<T> {
    /// Create an empty buffer with no watermark.
    pub fn new() -> Self {
        Self::with_watermark(None)
    }

    /// Create an empty buffer that warns when its length crosses `watermark`.
    pub fn with_watermark(watermark: Option<usize>) -> Self {
        Self {
            queue: SegQueue::new(),
            metrics: BufferMetrics::default(),
            watermark,
        }
    }

    /// Append an event to the tail.
    ///
    /// Non-blocking and safe from any number of concurrent producers.
    pub fn push(&self, event: T) {
        self.queue.push(event);
        self.metrics.pushed.fetch_add(1, Ordering::Relaxed);

        if let Some(mark) = self.watermark {
            // crossing detection is approximate under concurrent pushes
            let buffered = self.queue.len();
            if buffered == mark {
                warn!(buffered, watermark = mark, "event buffer crossed watermark");
            }
        }
    }

    /// Remove and return everything present at the moment of the call, in
    /// push order, leaving the buffer empty of those events.
    ///
    /// Subsequent calls see only newly pushed events; each event is
    /// delivered exactly once across drains.
    pub fn drain(&self) -> Vec<T> {
        let mut snapshot = Vec::new();
        while let Some(event) = self.queue.pop() {
            snapshot.push(event);
        }
        self.metrics
            .drained
            .fetch_add(snapshot.len() as u64, Ordering::Relaxed);
        snapshot
    }

    /// Current number of buffered events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total events pushed over the buffer's lifetime.
    pub fn total_pushed(&self) -> u64 {
        self.metrics.pushed.load(Ordering::Relaxed)
    }

    /// Total events drained over the buffer's lifetime.
    pub fn total_drained(&self) -> u64 {
        self.metrics.drained.load(Ordering::Relaxed)
    }
}

impl<T> Default for EventBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_drain_returns_pushes_in_order() {
        let buffer = EventBuffer::new();
        for i in 0..5 {
            buffer.push(i);
        }

        let drained = buffer.drain();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_second_drain_is_empty() {
        let buffer = EventBuffer::new();
        buffer.push("one");

        assert_eq!(buffer.drain().len(), 1);
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn test_drain_only_takes_snapshot() {
        let buffer = EventBuffer::new();
        buffer.push(1);
        let first = buffer.drain();
        buffer.push(2);
        let second = buffer.drain();

        assert_eq!(first, vec![1]);
        assert_eq!(second, vec![2]);
    }

    #[test]
    fn test_metrics() {
        let buffer = EventBuffer::new();
        for i in 0..10 {
            buffer.push(i);
        }
        buffer.drain();

        assert_eq!(buffer.total_pushed(), 10);
        assert_eq!(buffer.total_drained(), 10);
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let buffer = Arc::new(EventBuffer::new());
        let mut handles = vec![];

        for producer in 0..8 {
            let buffer = Arc::clone(&buffer);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    buffer.push(producer * 100 + i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let mut drained = buffer.drain();
        assert_eq!(drained.len(), 800);
        drained.sort_unstable();
        drained.dedup();
        assert_eq!(drained.len(), 800, "no event delivered twice");
    }

    #[test]
    fn test_drain_racing_pushes_delivers_each_event_once() {
        let buffer = Arc::new(EventBuffer::new());
        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for i in 0..1000 {
                    buffer.push(i);
                }
            })
        };

        let mut collected = Vec::new();
        while collected.len() < 1000 {
            collected.extend(buffer.drain());
        }
        producer.join().unwrap();

        assert_eq!(collected.len(), 1000);
        // FIFO order is preserved across interleaved drains
        assert!(collected.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_watermark_does_not_affect_delivery() {
        let buffer = EventBuffer::with_watermark(Some(2));
        for i in 0..5 {
            buffer.push(i);
        }
        assert_eq!(buffer.drain().len(), 5);
    }
}
