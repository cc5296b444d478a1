//! # Dictionary Errors
//!
//! Error types for loading and querying field dictionaries.

use crate::domain::value_objects::FieldId;
use thiserror::Error;

/// Errors raised by the field dictionary and its loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// A dictionary has already been loaded; the existing one is untouched.
    #[error("data dictionary has already been loaded: {name}")]
    AlreadyLoaded {
        /// Name of the dictionary that is in place.
        name: String,
    },

    /// The named dictionary resource does not exist.
    #[error("dictionary resource not found: {0}")]
    NotFound(String),

    /// The dictionary resource is malformed.
    #[error("{resource}:{line}: {reason}")]
    Parse {
        /// Resource being parsed.
        resource: String,
        /// One-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// The name is not defined by the dictionary.
    #[error("unknown field name: {0}")]
    UnknownField(String),

    /// A name or id is defined twice.
    #[error("duplicate dictionary entry: {0}")]
    Duplicate(String),

    /// An enumerated-value table refers to an id the dictionary lacks.
    #[error("enum table refers to undefined field {0}")]
    UndefinedEnumField(FieldId),
}

impl DictionaryError {
    /// Creates a parse error.
    #[must_use]
    pub fn parse(resource: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            resource: resource.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for dictionary operations.
pub type DictionaryResult<T> = Result<T, DictionaryError>;
