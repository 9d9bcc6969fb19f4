//! The typed-event contract every domain event satisfies.
//!
//! Strategies are generic over the event type; the [`Event`] trait is the
//! only thing the pipeline needs from a domain payload: identity for
//! tracing, an idempotency key for duplicate detection, and schema
//! metadata for evolution checks.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// High-level classification of an event by origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Emitted by the ingestion layer itself: lifecycle facts, errors.
    Platform,
    /// Carries business-domain meaning; what downstream consumers act on.
    Domain,
}

/// Contract implemented by every domain event flowing through a strategy.
///
/// All accessors are total: an event that exists has all of its metadata.
/// Implementations should be cheap to clone; the pipeline clones once per
/// buffered event to hand a reference to the `on_event` callback.
pub trait Event: Send + 'static {
    /// Globally unique identifier of this event instance.
    fn id(&self) -> &str;

    /// Identifier linking this event to a broader causal chain.
    ///
    /// All events triggered by the same originating action share one
    /// correlation id.
    fn correlation_id(&self) -> &str;

    /// Key used to detect duplicate deliveries of logically the same event.
    fn idempotency_key(&self) -> &str;

    /// Whether this is a domain or a platform event.
    fn category(&self) -> EventCategory;

    /// Dot-separated type name, e.g. `"parking.occupancy.updated"`.
    fn event_type(&self) -> &str;

    /// Business occurrence time, not ingestion time.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Schema version of the event payload.
    fn schema_version(&self) -> &SchemaVersion;
}

/// Validated semantic version of an event payload's shape.
///
/// Parsing accepts exactly `MAJOR.MINOR.PATCH`: three dot-separated
/// non-negative integers. Pre-release and build suffixes are rejected;
/// payload schemas version in whole steps.
///
/// ```
/// use keruu::SchemaVersion;
///
/// let v: SchemaVersion = "1.2.0".parse().unwrap();
/// assert_eq!(v.major(), 1);
/// assert!(v < "1.10.0".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

/// Rejected schema version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("schema version must follow MAJOR.MINOR.PATCH (e.g. \"1.0.0\"): {value:?}")]
pub struct SchemaVersionError {
    value: String,
}

impl SchemaVersion {
    /// Parse a `SchemaVersion` from its string form.
    pub fn new(value: &str) -> Result<Self, SchemaVersionError> {
        value.parse()
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaVersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaVersionError {
            value: value.to_string(),
        };

        let mut parts = value.split('.');
        let component = |part: Option<&str>| -> Result<u32, SchemaVersionError> {
            let part = part.ok_or_else(invalid)?;
            // u32::from_str accepts a leading '+'; semver components do not
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        let major = component(parts.next())?;
        let minor = component(parts.next())?;
        let patch = component(parts.next())?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_valid_versions() {
        let v = SchemaVersion::new("1.2.3").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 2, 3));
        assert_eq!(v.to_string(), "1.2.3");

        assert!("0.0.0".parse::<SchemaVersion>().is_ok());
        assert!("10.20.30".parse::<SchemaVersion>().is_ok());
    }

    #[test]
    fn test_rejects_malformed_versions() {
        for bad in [
            "", "1", "1.0", "1.0.0.0", "a.b.c", "1.0.x", "1..0", "1.0.",
            "1.0.0-alpha", "1.0.0+build", "+1.0.0", " 1.0.0", "-1.0.0",
        ] {
            assert!(
                bad.parse::<SchemaVersion>().is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_orders_numerically_not_lexically() {
        let small: SchemaVersion = "1.9.0".parse().unwrap();
        let large: SchemaVersion = "1.10.0".parse().unwrap();
        assert!(small < large);

        let v1: SchemaVersion = "2.0.0".parse().unwrap();
        let v2: SchemaVersion = "10.0.0".parse().unwrap();
        assert!(v1 < v2);
    }

    #[test]
    fn test_compares_by_value() {
        let a: SchemaVersion = "1.0.0".parse().unwrap();
        let b: SchemaVersion = "1.0.0".parse().unwrap();
        assert_eq!(a, b);
    }
}
