//! # Field Dictionary
//!
//! Maps field names to numeric field ids and declared types.
//!
//! This module provides:
//! - [`FieldDefinition`] - One dictionary entry
//! - [`EnumValue`] - Display text of one enumerated code
//! - [`Dictionary`] - Read-only name/id index shared by encoders and decoders
//! - [`DictionaryBuilder`] - Programmatic construction with duplicate checks
//!
//! A [`Dictionary`] is immutable once built and is `Send + Sync`, so one
//! instance behind an `Arc` serves every encoder, cursor and lookup in the
//! process.
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::entities::dictionary::DictionaryBuilder;
//! use mfeed::domain::value_objects::{FieldId, FieldType};
//!
//! let dictionary = DictionaryBuilder::new("test")
//!     .field("BID", 22, FieldType::Price, 17)
//!     .field("ASK", 25, FieldType::Price, 17)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(dictionary.resolve("BID").unwrap(), FieldId::new(22));
//! assert_eq!(dictionary.resolve_unknown("LAST"), None);
//! assert_eq!(dictionary.reverse_lookup_count(), 2);
//! ```

use crate::domain::errors::{DictionaryError, DictionaryResult};
use crate::domain::value_objects::{FieldId, FieldType, TypeHint};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field acronym, as carried in [`crate::domain::entities::Field::name`].
    name: String,
    /// Long display name.
    display_name: String,
    /// Numeric id.
    id: FieldId,
    /// Declared type.
    field_type: FieldType,
    /// Declared maximum width in bytes.
    width: u16,
    /// Field this one ripples into on update, if any.
    ripples_to: Option<String>,
}

impl FieldDefinition {
    /// Creates a definition whose display name equals its acronym.
    #[must_use]
    pub fn new(name: impl Into<String>, id: FieldId, field_type: FieldType, width: u16) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            id,
            field_type,
            width,
            ripples_to: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Sets the ripple target.
    #[must_use]
    pub fn with_ripples_to(mut self, target: impl Into<String>) -> Self {
        self.ripples_to = Some(target.into());
        self
    }

    /// Returns the field acronym.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Returns the declared type.
    #[inline]
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the declared width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the ripple target.
    #[inline]
    #[must_use]
    pub fn ripples_to(&self) -> Option<&str> {
        self.ripples_to.as_deref()
    }

    /// Returns true if `hint` may be used to encode this field.
    #[inline]
    #[must_use]
    pub fn accepts(&self, hint: TypeHint) -> bool {
        hint.accepts(self.field_type)
    }
}

/// Display text and meaning of one enumerated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    display: String,
    meaning: String,
}

impl EnumValue {
    /// Creates an enum value.
    #[must_use]
    pub fn new(display: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            meaning: meaning.into(),
        }
    }

    /// Returns the display text.
    #[inline]
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Returns the meaning.
    #[inline]
    #[must_use]
    pub fn meaning(&self) -> &str {
        &self.meaning
    }
}

type EnumTable = Arc<BTreeMap<u16, EnumValue>>;

/// Read-only field dictionary.
#[derive(Debug, Clone)]
pub struct Dictionary {
    name: String,
    definitions: Vec<FieldDefinition>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<FieldId, usize>,
    enums: HashMap<FieldId, EnumTable>,
}

impl Dictionary {
    /// Returns the dictionary name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves a field name to its id.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::UnknownField`] if the name is not defined.
    pub fn resolve(&self, name: &str) -> DictionaryResult<FieldId> {
        self.resolve_unknown(name)
            .ok_or_else(|| DictionaryError::UnknownField(name.to_string()))
    }

    /// Resolves a field name to its id, or `None` for unmapped fields.
    ///
    /// Unmapped fields are still legal on the wire, carried by name.
    #[must_use]
    pub fn resolve_unknown(&self, name: &str) -> Option<FieldId> {
        self.definition_by_name(name).map(FieldDefinition::id)
    }

    /// Returns the number of loaded entries.
    #[inline]
    #[must_use]
    pub fn reverse_lookup_count(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the dictionary has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn definition(&self, id: FieldId) -> Option<&FieldDefinition> {
        self.by_id
            .get(&id)
            .and_then(|&index| self.definitions.get(index))
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn definition_by_name(&self, name: &str) -> Option<&FieldDefinition> {
        self.by_name
            .get(name)
            .and_then(|&index| self.definitions.get(index))
    }

    /// Returns the display text of an enumerated code.
    ///
    /// `None` if the field has no enum table, the code is not numeric, or
    /// the table does not list it.
    #[must_use]
    pub fn enum_display(&self, id: FieldId, code: &str) -> Option<&EnumValue> {
        let code = code.trim().parse::<u16>().ok()?;
        self.enums.get(&id)?.get(&code)
    }

    /// Returns true if an enum table was loaded for `id`.
    #[must_use]
    pub fn has_enum_table(&self, id: FieldId) -> bool {
        self.enums.contains_key(&id)
    }

    /// Iterates definitions in load order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.definitions.iter()
    }
}

/// Builds a [`Dictionary`].
///
/// Duplicate names, duplicate ids, and enum tables for undefined ids are
/// reported by [`DictionaryBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    name: String,
    definitions: Vec<FieldDefinition>,
    enums: Vec<(Vec<FieldId>, BTreeMap<u16, EnumValue>)>,
}

impl DictionaryBuilder {
    /// Starts an empty dictionary.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a field definition.
    #[must_use]
    pub fn definition(mut self, definition: FieldDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds a field with the given name, id, type and width.
    #[must_use]
    pub fn field(self, name: &str, id: i16, field_type: FieldType, width: u16) -> Self {
        self.definition(FieldDefinition::new(name, FieldId::new(id), field_type, width))
    }

    /// Adds an enum table shared by every listed field.
    #[must_use]
    pub fn enum_table(
        mut self,
        ids: Vec<FieldId>,
        values: impl IntoIterator<Item = (u16, EnumValue)>,
    ) -> Self {
        self.enums.push((ids, values.into_iter().collect()));
        self
    }

    /// Returns the number of definitions added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if no definitions were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Builds the dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::Duplicate`] for a repeated name or id and
    /// [`DictionaryError::UndefinedEnumField`] for an enum table that lists
    /// an id with no definition.
    pub fn build(self) -> DictionaryResult<Dictionary> {
        let mut by_name = HashMap::with_capacity(self.definitions.len());
        let mut by_id = HashMap::with_capacity(self.definitions.len());
        for (index, definition) in self.definitions.iter().enumerate() {
            if by_name.insert(definition.name.clone(), index).is_some() {
                return Err(DictionaryError::Duplicate(definition.name.clone()));
            }
            if by_id.insert(definition.id, index).is_some() {
                return Err(DictionaryError::Duplicate(format!(
                    "{} ({})",
                    definition.id, definition.name
                )));
            }
        }

        let mut enums = HashMap::new();
        for (ids, values) in self.enums {
            let table: EnumTable = Arc::new(values);
            for id in ids {
                if !by_id.contains_key(&id) {
                    return Err(DictionaryError::UndefinedEnumField(id));
                }
                enums.insert(id, Arc::clone(&table));
            }
        }

        Ok(Dictionary {
            name: self.name,
            definitions: self.definitions,
            by_name,
            by_id,
            enums,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        DictionaryBuilder::new("sample")
            .field("BID", 22, FieldType::Price, 17)
            .field("PRC_QL_CD", 118, FieldType::Enumerated, 3)
            .field("PRC_QL3", 3264, FieldType::Enumerated, 3)
            .field("BID_MMID1", 293, FieldType::Alphanumeric, 4)
            .enum_table(
                vec![FieldId::new(118), FieldId::new(3264)],
                [
                    (0, EnumValue::new("   ", "normal market or not allocated")),
                    (1, EnumValue::new("CLS", "closing")),
                ],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn resolves_known_names() {
        let dictionary = sample();
        assert_eq!(dictionary.resolve("BID").unwrap(), FieldId::new(22));
        assert_eq!(
            dictionary.definition(FieldId::new(293)).unwrap().name(),
            "BID_MMID1"
        );
    }

    #[test]
    fn resolve_fails_for_unknown() {
        let dictionary = sample();
        assert_eq!(
            dictionary.resolve("ASK"),
            Err(DictionaryError::UnknownField("ASK".to_string()))
        );
        assert_eq!(dictionary.resolve_unknown("ASK"), None);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(sample().resolve_unknown("bid"), None);
    }

    #[test]
    fn enum_tables_are_shared() {
        let dictionary = sample();
        assert_eq!(
            dictionary.enum_display(FieldId::new(118), "0").unwrap().display(),
            "   "
        );
        assert_eq!(
            dictionary.enum_display(FieldId::new(3264), "1").unwrap().meaning(),
            "closing"
        );
        assert!(dictionary.enum_display(FieldId::new(118), "9").is_none());
        assert!(!dictionary.has_enum_table(FieldId::new(22)));
    }

    #[test]
    fn duplicate_name_rejected() {
        let result = DictionaryBuilder::new("dup")
            .field("BID", 22, FieldType::Price, 17)
            .field("BID", 23, FieldType::Price, 17)
            .build();
        assert_eq!(result.unwrap_err(), DictionaryError::Duplicate("BID".to_string()));
    }

    #[test]
    fn duplicate_id_rejected() {
        let result = DictionaryBuilder::new("dup")
            .field("BID", 22, FieldType::Price, 17)
            .field("ASK", 22, FieldType::Price, 17)
            .build();
        assert!(matches!(result, Err(DictionaryError::Duplicate(_))));
    }

    #[test]
    fn enum_table_for_undefined_field_rejected() {
        let result = DictionaryBuilder::new("enum")
            .field("BID", 22, FieldType::Price, 17)
            .enum_table(vec![FieldId::new(99)], [(0, EnumValue::new("", ""))])
            .build();
        assert_eq!(
            result.unwrap_err(),
            DictionaryError::UndefinedEnumField(FieldId::new(99))
        );
    }

    #[test]
    fn dictionary_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dictionary>();
    }
}
