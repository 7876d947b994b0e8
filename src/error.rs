//! # Engine Errors
//!
//! A single error type shared by the element store, the draw buckets, the
//! graphics backend and the configuration loader.
//!
//! Capacity and lifecycle errors are not expected during normal operation with
//! the fixed UI layout, but every mutation reports them instead of corrupting
//! its container. None of them is retried: the frame loop logs the error and
//! moves on to the next frame.

use thiserror::Error;

use crate::engine_state::rendering::BucketState;

/// Convenience alias used throughout the crate.
pub type EngineResult<T> = Result<T, EngineError>;

/// Every failure the sandbox can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A bounded container (element store or draw bucket) is full.
    #[error("{container} is full (capacity {capacity})")]
    CapacityExceeded {
        /// Name of the container that rejected the write
        container: &'static str,
        /// Fixed capacity of that container
        capacity: usize,
    },

    /// Pop was called on an empty element store.
    #[error("cannot pop from an empty element store")]
    Underflow,

    /// Pop would remove one of the built-in elements.
    #[error("pop rejected: {count} elements, first {reserved} are built-in")]
    ProtectedElement {
        /// Element count at the time of the request
        count: usize,
        /// Number of protected built-in elements
        reserved: usize,
    },

    /// An instance was pushed, or `end` was called, outside of `begin`/`end`.
    #[error("bucket '{bucket}' is not accumulating (state: {state:?})")]
    BucketNotAccumulating {
        /// Label of the bucket
        bucket: &'static str,
        /// State the bucket was in
        state: BucketState,
    },

    /// A bucket was read before `end` froze it.
    #[error("bucket '{bucket}' is not frozen (state: {state:?})")]
    BucketNotFrozen {
        /// Label of the bucket
        bucket: &'static str,
        /// State the bucket was in
        state: BucketState,
    },

    /// The graphics backend could not be created. Fatal to the session.
    #[error("graphics backend initialization failed: {0}")]
    BackendInitFailure(String),

    /// A frame could not be acquired or presented.
    #[error("surface error: {0}")]
    Surface(String),

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_container() {
        let err = EngineError::CapacityExceeded {
            container: "ui bucket",
            capacity: 4,
        };
        assert_eq!(err.to_string(), "ui bucket is full (capacity 4)");

        let err = EngineError::ProtectedElement {
            count: 3,
            reserved: 3,
        };
        assert!(err.to_string().contains("first 3 are built-in"));
    }
}
