//! # Codec Configuration
//!
//! Settings for dictionary resources, decoding and encoding.
//!
//! Configuration can be built in code, parsed from TOML, or loaded from an
//! optional file with `MFEED__` prefixed environment overrides, e.g.
//! `MFEED__DECODER__UNKNOWN_FIELDS=carry_as_id`.
//!
//! # Examples
//!
//! ```
//! use mfeed::infrastructure::config::CodecConfig;
//! use mfeed::infrastructure::mfeed::UnknownFieldPolicy;
//!
//! let config = CodecConfig::from_toml_str(
//!     r#"
//!     [dictionary]
//!     field_dictionary = "RDMFieldDictionary"
//!
//!     [decoder]
//!     unknown_fields = "carry_as_id"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.dictionary().field_dictionary(), "RDMFieldDictionary");
//! assert_eq!(config.dictionary().enum_dictionary(), Some("enumtype.def"));
//! assert_eq!(config.decoder().unknown_fields(), UnknownFieldPolicy::CarryAsId);
//! assert_eq!(config.encoder().initial_capacity(), 256);
//! ```

use super::mfeed::{DEFAULT_CAPACITY, UnknownFieldPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default field dictionary resource name.
pub const DEFAULT_FIELD_DICTIONARY: &str = "appendix_a";

/// Default enum table resource name.
pub const DEFAULT_ENUM_DICTIONARY: &str = "enumtype.def";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "MFEED";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Load(String),

    /// The configuration was read but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Dictionary resource names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Field dictionary resource.
    field_dictionary: String,
    /// Enum table resource; `None` skips enum tables.
    enum_dictionary: Option<String>,
}

impl DictionaryConfig {
    /// Returns the field dictionary resource name.
    #[inline]
    #[must_use]
    pub fn field_dictionary(&self) -> &str {
        &self.field_dictionary
    }

    /// Returns the enum table resource name.
    #[inline]
    #[must_use]
    pub fn enum_dictionary(&self) -> Option<&str> {
        self.enum_dictionary.as_deref()
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            field_dictionary: DEFAULT_FIELD_DICTIONARY.to_string(),
            enum_dictionary: Some(DEFAULT_ENUM_DICTIONARY.to_string()),
        }
    }
}

/// Decoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Handling of numeric ids missing from the dictionary.
    unknown_fields: UnknownFieldPolicy,
}

impl DecoderConfig {
    /// Returns the unknown field id policy.
    #[inline]
    #[must_use]
    pub fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Bytes preallocated per message.
    initial_capacity: usize,
}

impl EncoderConfig {
    /// Returns the initial buffer capacity.
    #[inline]
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Complete codec configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Dictionary resources.
    dictionary: DictionaryConfig,
    /// Decoder settings.
    decoder: DecoderConfig,
    /// Encoder settings.
    encoder: EncoderConfig,
}

impl CodecConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field dictionary resource.
    #[must_use]
    pub fn with_field_dictionary(mut self, name: impl Into<String>) -> Self {
        self.dictionary.field_dictionary = name.into();
        self
    }

    /// Sets or clears the enum table resource.
    #[must_use]
    pub fn with_enum_dictionary(mut self, name: Option<String>) -> Self {
        self.dictionary.enum_dictionary = name;
        self
    }

    /// Sets the unknown field id policy.
    #[must_use]
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.decoder.unknown_fields = policy;
        self
    }

    /// Sets the encoder's initial capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.encoder.initial_capacity = capacity;
        self
    }

    /// Returns the dictionary section.
    #[inline]
    #[must_use]
    pub fn dictionary(&self) -> &DictionaryConfig {
        &self.dictionary
    }

    /// Returns the decoder section.
    #[inline]
    #[must_use]
    pub fn decoder(&self) -> &DecoderConfig {
        &self.decoder
    }

    /// Returns the encoder section.
    #[inline]
    #[must_use]
    pub fn encoder(&self) -> &EncoderConfig {
        &self.encoder
    }

    /// Parses and validates TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] for malformed TOML and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from an optional file, then applies environment overrides.
    ///
    /// The file format follows its extension. A missing file is not an
    /// error. Variables look like `MFEED__ENCODER__INITIAL_CAPACITY=512`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be read or
    /// deserialized and [`ConfigError::Invalid`] if validation fails.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded codec configuration");
        Ok(config)
    }

    /// Checks the configuration for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for empty resource names or a zero
    /// initial capacity.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.dictionary.field_dictionary.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "dictionary.field_dictionary must not be empty".to_string(),
            ));
        }
        if self
            .dictionary
            .enum_dictionary
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "dictionary.enum_dictionary must not be empty".to_string(),
            ));
        }
        if self.encoder.initial_capacity == 0 {
            return Err(ConfigError::Invalid(
                "encoder.initial_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
