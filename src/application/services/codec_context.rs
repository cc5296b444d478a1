//! # Codec Context
//!
//! One loaded dictionary plus the codec configuration, handed to every
//! builder, cursor and lookup that needs them.
//!
//! The context owns its dictionary through an `Arc`, so it is cheap to
//! clone and share across threads. Nothing here is global: tests build a
//! context around a fabricated dictionary with [`CodecContext::new`].

use super::field_lookup::FieldLookup;
use crate::application::error::ApplicationResult;
use crate::domain::entities::Dictionary;
use crate::domain::value_objects::MessageHeader;
use crate::infrastructure::config::CodecConfig;
use crate::infrastructure::dictionary::DictionaryLoader;
use crate::infrastructure::mfeed::{CodecResult, FieldCursor, Fields, MessageBuffer, MessageBuilder};
use std::sync::Arc;

/// Dictionary and configuration shared by codec operations.
///
/// # Examples
///
/// ```
/// use mfeed::application::services::CodecContext;
/// use mfeed::domain::value_objects::{MessageHeader, RecordType, TypeHint};
/// use mfeed::infrastructure::config::CodecConfig;
/// use mfeed::infrastructure::dictionary::{DictionaryLoader, InMemoryDictionarySource};
///
/// let source = InMemoryDictionarySource::new()
///     .with_resource("appendix_a", "BIDSIZE \"BID SIZE\" 30 NULL INTEGER 15");
/// let loader = DictionaryLoader::new(source);
/// let config = CodecConfig::new().with_enum_dictionary(None);
/// let context = CodecContext::bootstrap(&config, &loader).unwrap();
///
/// let header = MessageHeader::new(RecordType::Update, "XX", "TIBX.O");
/// let mut builder = context.builder(&header).unwrap();
/// builder.append("BIDSIZE", 7_i64, TypeHint::DENOM_NONE).unwrap();
/// let buffer = builder.finish();
///
/// assert_eq!(context.lookup().get(&buffer, "BIDSIZE").unwrap().string_value(), "7");
/// ```
#[derive(Debug, Clone)]
pub struct CodecContext {
    dictionary: Arc<Dictionary>,
    config: CodecConfig,
}

impl CodecContext {
    /// Wraps an already loaded dictionary.
    #[must_use]
    pub fn new(dictionary: Arc<Dictionary>, config: CodecConfig) -> Self {
        Self { dictionary, config }
    }

    /// Validates `config` and loads its dictionary resources through
    /// `loader`.
    ///
    /// If `loader` already holds the configured dictionary it is reused.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid,
    /// [`AlreadyLoaded`](crate::domain::errors::DictionaryError::AlreadyLoaded)
    /// if `loader` holds a different dictionary, and any error raised while
    /// loading.
    pub fn bootstrap(config: &CodecConfig, loader: &DictionaryLoader) -> ApplicationResult<Self> {
        config.validate()?;
        let name = config.dictionary().field_dictionary();

        let dictionary = loader.get_or_load(name, config.dictionary().enum_dictionary())?;

        tracing::debug!(
            dictionary = dictionary.name(),
            entries = dictionary.reverse_lookup_count(),
            unknown_fields = ?config.decoder().unknown_fields(),
            "codec context ready"
        );
        Ok(Self::new(dictionary, config.clone()))
    }

    /// Returns the dictionary.
    #[inline]
    #[must_use]
    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Starts a message with the configured initial capacity.
    ///
    /// # Errors
    ///
    /// Same as [`MessageBuilder::new`].
    pub fn builder(&self, header: &MessageHeader) -> CodecResult<MessageBuilder<'_>> {
        MessageBuilder::with_capacity(&self.dictionary, header, self.config.encoder().initial_capacity())
    }

    /// Returns a cursor with the configured unknown field policy.
    #[must_use]
    pub fn cursor(&self) -> FieldCursor<'_> {
        FieldCursor::new(&self.dictionary).with_policy(self.config.decoder().unknown_fields())
    }

    /// Iterates over the fields of `buffer` with the configured policy.
    #[must_use]
    pub fn fields(&self, buffer: &MessageBuffer) -> Fields<'_> {
        Fields::new(self.cursor(), buffer.clone())
    }

    /// Returns a lookup service with the configured policy.
    #[must_use]
    pub fn lookup(&self) -> FieldLookup<'_> {
        FieldLookup::new(&self.dictionary).with_policy(self.config.decoder().unknown_fields())
    }
}
