//! # Dictionary Loader
//!
//! Loads the process dictionary exactly once.
//!
//! A second load attempt fails with [`DictionaryError::AlreadyLoaded`] and
//! leaves the loaded dictionary untouched: two dictionaries with divergent
//! id assignments feeding the same codec would corrupt lookups silently.
//! Attempts are serialised, so racing callers cannot both succeed. A load
//! that fails (missing or malformed resource) does not count as loaded.
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::errors::DictionaryError;
//! use mfeed::infrastructure::dictionary::{DictionaryLoader, InMemoryDictionarySource};
//!
//! let source = InMemoryDictionarySource::new()
//!     .with_resource("appendix_a", "BID \"BID\" 22 NULL PRICE 17");
//! let loader = DictionaryLoader::new(source);
//!
//! let dictionary = loader.load("appendix_a").unwrap();
//! assert_eq!(dictionary.reverse_lookup_count(), 1);
//! assert!(matches!(
//!     loader.load("appendix_a"),
//!     Err(DictionaryError::AlreadyLoaded { .. })
//! ));
//! ```

use super::appendix_a::parse_field_definitions;
use super::enum_type::parse_enum_tables;
use super::source::DictionarySource;
use crate::domain::entities::{Dictionary, DictionaryBuilder};
use crate::domain::errors::{DictionaryError, DictionaryResult};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Load-once owner of the field dictionary.
#[derive(Debug)]
pub struct DictionaryLoader {
    source: Box<dyn DictionarySource>,
    loaded: Mutex<Option<Arc<Dictionary>>>,
}

impl DictionaryLoader {
    /// Creates a loader reading from `source`.
    #[must_use]
    pub fn new(source: impl DictionarySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            loaded: Mutex::new(None),
        }
    }

    /// Loads the named field dictionary.
    ///
    /// # Errors
    ///
    /// - [`DictionaryError::AlreadyLoaded`] if a dictionary is in place
    /// - [`DictionaryError::NotFound`] if the resource does not exist
    /// - [`DictionaryError::Parse`] or [`DictionaryError::Duplicate`] if it is malformed
    pub fn load(&self, name: &str) -> DictionaryResult<Arc<Dictionary>> {
        self.load_resources(name, None)
    }

    /// Loads the named field dictionary together with its enum table.
    ///
    /// Enum blocks naming fields absent from the field dictionary are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Same as [`DictionaryLoader::load`], for either resource.
    pub fn load_with_enums(&self, name: &str, enum_name: &str) -> DictionaryResult<Arc<Dictionary>> {
        self.load_resources(name, Some(enum_name))
    }

    /// Returns the loaded dictionary if it is the one named, loading it
    /// otherwise.
    ///
    /// The check and the load happen under one lock, so callers racing
    /// with the same resource names all receive the same dictionary.
    ///
    /// # Errors
    ///
    /// [`DictionaryError::AlreadyLoaded`] if a differently named dictionary
    /// is in place, otherwise the same as [`DictionaryLoader::load`].
    pub fn get_or_load(&self, name: &str, enum_name: Option<&str>) -> DictionaryResult<Arc<Dictionary>> {
        let mut slot = self.loaded.lock();
        match slot.as_ref() {
            Some(existing) if existing.name() == name => Ok(Arc::clone(existing)),
            Some(existing) => Err(reject_second_load(name, existing)),
            None => self.fill(&mut slot, name, enum_name),
        }
    }

    /// Returns the loaded dictionary, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<Dictionary>> {
        self.loaded.lock().clone()
    }

    /// Returns true once a dictionary has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.lock().is_some()
    }

    fn load_resources(&self, name: &str, enum_name: Option<&str>) -> DictionaryResult<Arc<Dictionary>> {
        let mut slot = self.loaded.lock();
        match slot.as_ref() {
            Some(existing) => Err(reject_second_load(name, existing)),
            None => self.fill(&mut slot, name, enum_name),
        }
    }

    /// Parses the resources and stores the result in the empty `slot`.
    fn fill(
        &self,
        slot: &mut Option<Arc<Dictionary>>,
        name: &str,
        enum_name: Option<&str>,
    ) -> DictionaryResult<Arc<Dictionary>> {
        let text = self.source.read(name)?;
        let definitions = parse_field_definitions(name, &text)?;
        let known: HashSet<_> = definitions.iter().map(|d| d.id()).collect();
        let mut builder = definitions
            .into_iter()
            .fold(DictionaryBuilder::new(name), DictionaryBuilder::definition);

        if let Some(enum_name) = enum_name {
            let text = self.source.read(enum_name)?;
            for block in parse_enum_tables(enum_name, &text)? {
                let (ids, unknown): (Vec<_>, Vec<_>) =
                    block.fields.iter().partition(|(_, id)| known.contains(id));
                for (acronym, id) in unknown {
                    tracing::warn!(
                        resource = enum_name,
                        field = %acronym,
                        fid = %id,
                        "enum table names a field missing from the dictionary"
                    );
                }
                if !ids.is_empty() {
                    builder = builder.enum_table(ids.into_iter().map(|(_, id)| *id).collect(), block.values);
                }
            }
        }

        let dictionary = Arc::new(builder.build()?);
        tracing::info!(
            dictionary = name,
            enum_table = enum_name.unwrap_or("none"),
            entries = dictionary.reverse_lookup_count(),
            "loaded field dictionary"
        );
        *slot = Some(Arc::clone(&dictionary));
        Ok(dictionary)
    }
}

fn reject_second_load(requested: &str, existing: &Dictionary) -> DictionaryError {
    tracing::warn!(
        requested,
        loaded = existing.name(),
        "rejected second dictionary load"
    );
    DictionaryError::AlreadyLoaded {
        name: existing.name().to_string(),
    }
}
