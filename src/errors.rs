//! Error types for the crate.
//!
//! Parsing untrusted bytes is the only fallible surface of the engine:
//! every other misuse (inverting zero, oversized scale constants) is a
//! caller precondition violation and panics via `assert!`.
//!
//! The errors are implemented with `thiserror` so they are easy to convert
//! and debug in higher-level code.

use thiserror::Error;

/// Errors returned when decoding element bytes or composite buffers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A 48-byte scalar encoding was numerically at or above the field
    /// modulus. Canonical encodings are unique; anything else is rejected.
    #[error("scalar encoding is not below the field modulus")]
    ScalarOutOfRange,
    /// A group or target-group encoding failed validation.
    #[error("invalid {group} encoding: {reason}")]
    InvalidPoint {
        group: &'static str,
        reason: &'static str,
    },
    /// A composite buffer was shorter or longer than the elements read
    /// from it.
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A field element presented as a message block does not carry a
    /// well-formed block payload.
    #[error("malformed message block: {0}")]
    MalformedMessage(&'static str),
}
