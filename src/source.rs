//! Collaborator interfaces the ingestion layer consumes.
//!
//! Concrete connectors (an HTTP poller, a database reader, a Kafka
//! consumer, a webhook controller) live outside this crate and plug in
//! through these traits. Closures qualify wherever a trait has a single
//! method, so quick wiring needs no named types.

use crate::error::{DeserializeError, KeruuError, SourceError};
use std::sync::Arc;

/// Handler a stream source calls once per inbound raw payload.
pub type MessageHandler<R> = Arc<dyn Fn(R) + Send + Sync>;

/// Handler invoked with recoverable ingestion errors.
pub type ErrorHandler = Arc<dyn Fn(KeruuError) + Send + Sync>;

/// Callback invoked with each event that made it into the user-visible
/// stream.
pub type EventCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Synchronous on-demand source for the pull strategy.
///
/// `read` produces one finite batch of raw payloads per call and must not
/// deserialize; retry and backoff for failed reads belong to the
/// implementation, not the core.
pub trait FetchSource<R>: Send + Sync {
    fn read(&self) -> std::result::Result<Vec<R>, SourceError>;
}

impl<R, F> FetchSource<R> for F
where
    F: Fn() -> std::result::Result<Vec<R>, SourceError> + Send + Sync,
{
    fn read(&self) -> std::result::Result<Vec<R>, SourceError> {
        self()
    }
}

/// Continuous push source for the stream strategy.
///
/// `start` may block the calling thread or return immediately and deliver
/// from source-owned threads; the strategy supports either. Once `stop`
/// returns, the source must deliver to neither handler again.
pub trait StreamSource<R>: Send + Sync {
    fn start(
        &self,
        on_message: MessageHandler<R>,
        on_error: ErrorHandler,
    ) -> std::result::Result<(), SourceError>;

    fn stop(&self) -> std::result::Result<(), SourceError>;
}

/// Inbound side of a push-based ingestion channel.
///
/// Webhook strategies implement this; an external transport (e.g. an HTTP
/// handler) calls [`receive`](EventInbox::receive) once per inbound
/// payload and returns immediately.
pub trait EventInbox<R> {
    fn receive(&self, raw: R);
}

/// Turns one raw payload into one typed event.
///
/// Must be stateless and side-effect free: the pipeline owns duplicate
/// detection, observation, and buffering.
pub trait EventDeserializer<R, T>: Send + Sync {
    fn deserialize(&self, raw: &R) -> std::result::Result<T, DeserializeError>;
}

impl<R, T, F> EventDeserializer<R, T> for F
where
    F: Fn(&R) -> std::result::Result<T, DeserializeError> + Send + Sync,
{
    fn deserialize(&self, raw: &R) -> std::result::Result<T, DeserializeError> {
        self(raw)
    }
}
