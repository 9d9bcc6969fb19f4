//! keruu - Strategy-Based Event Ingestion
//!
//! One lifecycle over three delivery models: on-demand pull, continuous
//! push-stream, and externally-pushed webhook. Raw payloads from a
//! source become typed, deduplicated events collected on demand.
//!
//! # Architecture
//!
//! ```text
//! Source ──► Pipeline (deserialize, dedup, observe) ──► Buffer ──► collect()
//!                          │
//!                          └──► PlatformBus (operational facts)
//! ```
//!
//! Sources, deserializers, and callbacks plug in via traits; closures
//! qualify for all single-method seams.
//!
//! # Example
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use keruu::{
//!     DeserializeError, Event, EventCategory, EventInbox, EventSource, SchemaVersion,
//! };
//!
//! #[derive(Debug, Clone)]
//! struct OccupancyChanged {
//!     key: String,
//!     at: DateTime<Utc>,
//!     version: SchemaVersion,
//! }
//!
//! impl Event for OccupancyChanged {
//!     fn id(&self) -> &str { &self.key }
//!     fn correlation_id(&self) -> &str { &self.key }
//!     fn idempotency_key(&self) -> &str { &self.key }
//!     fn category(&self) -> EventCategory { EventCategory::Domain }
//!     fn event_type(&self) -> &str { "parking.occupancy.changed" }
//!     fn occurred_at(&self) -> DateTime<Utc> { self.at }
//!     fn schema_version(&self) -> &SchemaVersion { &self.version }
//! }
//!
//! let inbox = keruu::webhook::<String>()
//!     .deserialize_with(|raw: &String| -> Result<OccupancyChanged, DeserializeError> {
//!         Ok(OccupancyChanged {
//!             key: raw.clone(),
//!             at: Utc::now(),
//!             version: SchemaVersion::new("1.0.0")
//!                 .map_err(|e| DeserializeError::new(e.to_string()))?,
//!         })
//!     })
//!     .build();
//!
//! inbox.receive("lot-7".to_string());
//! inbox.receive("lot-7".to_string()); // duplicate, dropped
//!
//! let events = inbox.collect()?;
//! assert_eq!(events.len(), 1);
//! # Ok::<(), keruu::KeruuError>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod buffer;
pub mod bus;
pub mod dedup;
pub mod dsl;
pub mod error;
pub mod event;
pub mod payload;
mod pipeline;
pub mod platform;
pub mod source;
pub mod strategy;

pub use buffer::EventBuffer;
pub use bus::{NoopBus, PlatformBus, RecordingBus, TracingBus};
pub use dedup::SeenKeys;
pub use dsl::{pull, stream, webhook};
pub use error::{DeserializeError, KeruuError, Result, SourceError};
pub use event::{Event, EventCategory, SchemaVersion, SchemaVersionError};
pub use payload::RawPayload;
pub use platform::{PlatformEvent, SourceType};
pub use source::{
    ErrorHandler, EventCallback, EventDeserializer, EventInbox, FetchSource, MessageHandler,
    StreamSource,
};
pub use strategy::{EventSource, PullStrategy, StreamStrategy, WebhookStrategy};
