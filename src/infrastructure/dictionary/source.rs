//! # Dictionary Sources
//!
//! Collaborators that hand dictionary resources to the loader by name.
//!
//! Reading resources from persistent storage is the caller's concern; the
//! crate ships [`InMemoryDictionarySource`] for embedding and tests.

use crate::domain::errors::{DictionaryError, DictionaryResult};
use std::collections::HashMap;
use std::fmt;

/// Supplies dictionary resources by name.
pub trait DictionarySource: Send + Sync + fmt::Debug {
    /// Returns the text of the named resource.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::NotFound`] if no such resource exists.
    fn read(&self, name: &str) -> DictionaryResult<String>;
}

/// In-memory implementation of [`DictionarySource`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryDictionarySource {
    resources: HashMap<String, String>,
}

impl InMemoryDictionarySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource.
    #[must_use]
    pub fn with_resource(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.resources.insert(name.into(), text.into());
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if the source holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl DictionarySource for InMemoryDictionarySource {
    fn read(&self, name: &str) -> DictionaryResult<String> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| DictionaryError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_source_is_empty() {
        let source = InMemoryDictionarySource::new();
        assert!(source.is_empty());
    }

    #[test]
    fn reads_inserted_resource() {
        let source = InMemoryDictionarySource::new().with_resource("appendix_a", "BID");
        assert_eq!(source.len(), 1);
        assert_eq!(source.read("appendix_a").unwrap(), "BID");
    }

    #[test]
    fn missing_resource_is_not_found() {
        let source = InMemoryDictionarySource::new();
        assert_eq!(
            source.read("enumtype.def"),
            Err(DictionaryError::NotFound("enumtype.def".to_string()))
        );
    }
}
