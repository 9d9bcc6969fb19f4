//! The three ingestion strategies behind one collection contract.
//!
//! ```text
//! FetchSource ──► PullStrategy ────┐
//! StreamSource ─► StreamStrategy ──┼──► collect() ──► Vec<T>
//! EventInbox ───► WebhookStrategy ─┘
//! ```
//!
//! Pull re-reads its source on every collection; stream and webhook
//! accumulate into a strategy-owned [`crate::buffer::EventBuffer`] and
//! hand it over on demand.

pub mod pull;
pub mod stream;
pub mod webhook;

pub use pull::PullStrategy;
pub use stream::StreamStrategy;
pub use webhook::WebhookStrategy;

use crate::error::Result;

/// Uniform lifecycle every strategy exposes.
///
/// `open` and `close` default to no-ops for strategies without persistent
/// lifecycle state (pull, webhook). Strategies with real lifecycle
/// (stream) also close themselves on drop, so scoped use is safe without
/// an explicit `close()` on every exit path.
pub trait EventSource<T>: Send {
    /// Transition to active. Fails with an illegal-state error if the
    /// strategy is already open.
    fn open(&self) -> Result<()> {
        Ok(())
    }

    /// Collect all events currently available, in order.
    ///
    /// Pull fetches fresh data; stream and webhook drain their buffer.
    /// Each event is returned by exactly one `collect` call.
    fn collect(&self) -> Result<Vec<T>>;

    /// Transition to closed. Safe to call on an already-closed strategy.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}
