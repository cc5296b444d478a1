//! # Codec Error Types
//!
//! Error types for MarketFeed encoding and decoding operations.

use crate::domain::value_objects::ValueError;
use thiserror::Error;

/// Errors that can occur during MarketFeed encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The encoder was given a value it cannot carry.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field (or header element) being written.
        field: String,
        /// Why the value was refused.
        reason: String,
    },

    /// A named lookup scanned the whole message without a match.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// A field record could not be decoded.
    #[error("malformed field at byte {offset}: {reason}")]
    MalformedField {
        /// Byte offset of the record in the message.
        offset: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// The message frame or header could not be decoded.
    #[error("malformed message header: {0}")]
    MalformedHeader(String),

    /// A cursor accessor was called without a current field.
    #[error("invalid cursor state: {0}")]
    InvalidCursorState(&'static str),
}

impl CodecError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a malformed field error.
    #[must_use]
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            offset,
            reason: reason.into(),
        }
    }

    /// Wraps a value error raised while decoding the record at `offset`.
    #[must_use]
    pub fn malformed_value(offset: usize, field: &str, error: &ValueError) -> Self {
        Self::malformed(offset, format!("{field}: {error}"))
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
