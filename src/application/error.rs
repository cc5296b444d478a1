//! # Application Errors
//!
//! Error type for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Dictionary(DictionaryError) - Loading or resolving field definitions
//! ├── Codec(CodecError)           - Encoding or decoding a message
//! └── Config(ConfigError)         - Reading or validating configuration
//! ```
//!
//! # Examples
//!
//! ```
//! use mfeed::application::error::ApplicationError;
//! use mfeed::infrastructure::mfeed::CodecError;
//!
//! let err: ApplicationError = CodecError::FieldNotFound("LAST".to_string()).into();
//! assert!(err.is_not_found());
//! assert!(err.to_string().contains("LAST"));
//! ```

use crate::domain::errors::DictionaryError;
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::mfeed::CodecError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// Dictionary error.
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApplicationError {
    /// Returns true if a named field or resource was not found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Codec(CodecError::FieldNotFound(_))
                | Self::Dictionary(DictionaryError::NotFound(_) | DictionaryError::UnknownField(_))
        )
    }

    /// Returns true if the input bytes were malformed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Codec(CodecError::MalformedField { .. } | CodecError::MalformedHeader(_))
        )
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dictionary_error() {
        let err: ApplicationError = DictionaryError::NotFound("appendix_a".to_string()).into();
        assert!(err.to_string().contains("dictionary"));
        assert!(err.to_string().contains("appendix_a"));
        assert!(err.is_not_found());
    }

    #[test]
    fn from_codec_error() {
        let err: ApplicationError = CodecError::malformed(12, "missing US").into();
        assert!(err.to_string().contains("codec"));
        assert!(err.is_malformed());
        assert!(!err.is_not_found());
    }

    #[test]
    fn from_config_error() {
        let err: ApplicationError = ConfigError::Invalid("zero capacity".to_string()).into();
        assert!(err.to_string().contains("zero capacity"));
        assert!(!err.is_malformed());
    }
}
