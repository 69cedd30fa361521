//! Error handling helpers for the storage crate.
//!
//! The storage layer keeps its error surface small: capacity validation at
//! construction time and frame-store failures. Everything else is expressed
//! through result enums ([`crate::FrameRead`]) rather than errors, because
//! an empty ring or a timeout is ordinary control flow for the callers.

use std::fmt;

/// Convenience result alias for fallible ring operations.
pub type RingResult<T, E = RingError> = Result<T, E>;

/// Errors surfaced when constructing storage primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Requested ring capacity cannot represent even one reserved slot.
    InvalidCapacity { requested: usize, minimum: usize },
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingError::InvalidCapacity { requested, minimum } => {
                write!(
                    f,
                    "ring capacity {requested} must be at least {minimum} bytes"
                )
            }
        }
    }
}

impl std::error::Error for RingError {}

/// Failures reported by [`crate::FrameCodec::store`].
///
/// Every variant leaves the ring exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Not enough free space for the whole frame; nothing was written.
    Overflow { needed: usize, free: usize },
    /// Payload length does not fit the 2-byte length prefix.
    PayloadTooLong { len: usize, max: usize },
    /// The configured format carries an indicator byte but none was supplied.
    MissingIndicator,
    /// The configured format has no indicator slot but one was supplied.
    UnexpectedIndicator,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Overflow { needed, free } => {
                write!(f, "frame needs {needed} bytes but only {free} are free")
            }
            StoreError::PayloadTooLong { len, max } => {
                write!(f, "payload of {len} bytes exceeds the {max}-byte length prefix")
            }
            StoreError::MissingIndicator => {
                write!(f, "frame format requires an indicator byte")
            }
            StoreError::UnexpectedIndicator => {
                write!(f, "frame format has no indicator slot")
            }
        }
    }
}

impl std::error::Error for StoreError {}
