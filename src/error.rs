//! Error types for keruu.

use thiserror::Error;

/// Result type alias for keruu operations
pub type Result<T> = std::result::Result<T, KeruuError>;

/// Main error type for keruu
#[derive(Error, Debug)]
pub enum KeruuError {
    /// Per-payload, recoverable: the payload is dropped and processing of
    /// subsequent payloads continues.
    #[error("deserialization failed: {0}")]
    Deserialize(#[from] DeserializeError),

    /// A source collaborator failed. For pull this aborts the batch; for
    /// stream it reaches the configured error callback.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Lifecycle misuse: collect before open, double open. Programmer
    /// error, never silently ignored.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),
}

/// Error type for source collaborators (fetch and stream sources).
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Read failed
    #[error("read failed: {0}")]
    Read(String),

    /// Start failed
    #[error("start failed: {0}")]
    Start(String),

    /// Stop failed
    #[error("stop failed: {0}")]
    Stop(String),
}

/// A payload the deserializer could not turn into a typed event.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DeserializeError {
    message: String,
}

impl DeserializeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_error_wraps_into_keruu_error() {
        let err: KeruuError = DeserializeError::new("unexpected eof").into();
        assert!(matches!(err, KeruuError::Deserialize(_)));
        assert_eq!(err.to_string(), "deserialization failed: unexpected eof");
    }

    #[test]
    fn test_source_error_wraps_into_keruu_error() {
        let err: KeruuError = SourceError::Read("connection refused".into()).into();
        assert!(matches!(err, KeruuError::Source(_)));
        assert_eq!(err.to_string(), "source error: read failed: connection refused");
    }

    #[test]
    fn test_illegal_state_message() {
        let err = KeruuError::IllegalState("call open() before collect()");
        assert_eq!(err.to_string(), "illegal state: call open() before collect()");
    }
}
