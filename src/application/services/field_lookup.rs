//! # Field Lookup
//!
//! Strategies for reading named fields out of a message.
//!
//! This module provides the [`FieldLookup`] service and the
//! [`LookupStrategy`] selector. Every strategy returns the same values;
//! they differ only in how much of the message they decode:
//!
//! - [`LookupStrategy::Direct`]: one [`get`](FieldLookup::get) per name,
//!   each re-scanning from the first field
//! - [`LookupStrategy::Scan`]: one pass that stops once every name was seen
//! - [`LookupStrategy::HashMap`] / [`LookupStrategy::OrderedMap`]: one pass
//!   into a map, then lookups in the map

use crate::domain::entities::{Dictionary, Field};
use crate::infrastructure::mfeed::{
    CodecError, CodecResult, CursorStatus, FieldCursor, MessageBuffer, UnknownFieldPolicy,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// How [`FieldLookup::values`] finds its fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// One independent get per name.
    #[default]
    Direct,
    /// Single scan stopping at the last requested name.
    Scan,
    /// Single scan into a hash map.
    HashMap,
    /// Single scan into an ordered map.
    OrderedMap,
}

impl LookupStrategy {
    /// All strategies.
    pub const ALL: [Self; 4] = [Self::Direct, Self::Scan, Self::HashMap, Self::OrderedMap];

    /// Returns the strategy name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Scan => "scan",
            Self::HashMap => "hash_map",
            Self::OrderedMap => "ordered_map",
        }
    }
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named field access over one dictionary.
///
/// # Examples
///
/// ```
/// use mfeed::application::services::{FieldLookup, LookupStrategy};
/// use mfeed::domain::entities::DictionaryBuilder;
/// use mfeed::domain::value_objects::FieldType;
/// use mfeed::infrastructure::mfeed::MessageBuffer;
/// use std::collections::BTreeMap;
///
/// let dictionary = DictionaryBuilder::new("demo")
///     .field("BID", 22, FieldType::Price, 17)
///     .field("ASK", 25, FieldType::Price, 17)
///     .build()
///     .unwrap();
/// let buffer = MessageBuffer::from(
///     &b"\x1c316\x1fXX\x1dTIBX.O\x1e22\x1f+21.42\x1e25\x1f+21.43\x1c"[..],
/// );
/// let lookup = FieldLookup::new(&dictionary);
///
/// let values = lookup.values(&buffer, &["ASK", "BID"], LookupStrategy::Scan).unwrap();
/// assert_eq!(values, ["21.43", "21.42"]);
///
/// let map: BTreeMap<String, String> = lookup.collect_named(&buffer, &["BID"]).unwrap();
/// assert_eq!(map["BID"], "21.42");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldLookup<'d> {
    dictionary: &'d Dictionary,
    policy: UnknownFieldPolicy,
}

impl<'d> FieldLookup<'d> {
    /// Creates a lookup that rejects unknown field ids.
    #[must_use]
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self {
            dictionary,
            policy: UnknownFieldPolicy::default(),
        }
    }

    /// Sets the policy for unknown field ids.
    #[must_use]
    pub fn with_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the first field named `name`, scanning from the start.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldNotFound`] if absent, or the first
    /// decoding error met before it.
    pub fn get(&self, buffer: &MessageBuffer, name: &str) -> CodecResult<Field> {
        self.cursor().seek(buffer, name)
    }

    /// Returns the string values of `names` in request order, decoding the
    /// message once and stopping after the last of them.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldNotFound`] for the first name that is not
    /// in the message, or the first decoding error met.
    pub fn find_first(&self, buffer: &MessageBuffer, names: &[&str]) -> CodecResult<Vec<String>> {
        let found: HashMap<String, String> = self.collect_named(buffer, names)?;
        names
            .iter()
            .map(|name| {
                found
                    .get(*name)
                    .cloned()
                    .ok_or_else(|| CodecError::FieldNotFound((*name).to_string()))
            })
            .collect()
    }

    /// Scans into a map of name to string value, keeping the first
    /// occurrence of each requested name. Stops as soon as all of them are
    /// collected; names missing from the message are missing from the map.
    ///
    /// # Errors
    ///
    /// Returns the first decoding error met.
    pub fn collect_named<M>(&self, buffer: &MessageBuffer, names: &[&str]) -> CodecResult<M>
    where
        M: Default + Extend<(String, String)>,
    {
        let mut remaining: HashSet<&str> = names.iter().copied().collect();
        let mut map = M::default();
        if remaining.is_empty() {
            return Ok(map);
        }

        let mut cursor = self.cursor();
        let mut status = cursor.first(buffer)?;
        while status == CursorStatus::Ok {
            let name = cursor.name()?;
            if remaining.remove(name) {
                map.extend([(name.to_string(), cursor.string_value()?)]);
                if remaining.is_empty() {
                    break;
                }
            }
            status = cursor.next()?;
        }
        Ok(map)
    }

    /// Scans every field into a map of name to field. Later duplicates
    /// replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns the first decoding error met.
    pub fn collect_all<M>(&self, buffer: &MessageBuffer) -> CodecResult<M>
    where
        M: Default + Extend<(String, Field)>,
    {
        let mut map = M::default();
        let mut cursor = self.cursor();
        let mut status = cursor.first(buffer)?;
        while status == CursorStatus::Ok {
            let field = cursor.field()?;
            map.extend([(field.name().to_string(), field)]);
            status = cursor.next()?;
        }
        Ok(map)
    }

    /// Returns the string values of `names` in request order using
    /// `strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldNotFound`] for the first absent name, or
    /// the first decoding error met.
    pub fn values(
        &self,
        buffer: &MessageBuffer,
        names: &[&str],
        strategy: LookupStrategy,
    ) -> CodecResult<Vec<String>> {
        match strategy {
            LookupStrategy::Direct => names
                .iter()
                .map(|name| self.get(buffer, name).map(|field| field.string_value()))
                .collect(),
            LookupStrategy::Scan => self.find_first(buffer, names),
            LookupStrategy::HashMap => {
                let map: HashMap<String, Field> = self.collect_all(buffer)?;
                pick(names, |name| map.get(name))
            }
            LookupStrategy::OrderedMap => {
                let map: BTreeMap<String, Field> = self.collect_all(buffer)?;
                pick(names, |name| map.get(name))
            }
        }
    }

    fn cursor(&self) -> FieldCursor<'d> {
        FieldCursor::new(self.dictionary).with_policy(self.policy)
    }
}

fn pick<'m>(
    names: &[&str],
    lookup: impl Fn(&str) -> Option<&'m Field>,
) -> CodecResult<Vec<String>> {
    names
        .iter()
        .map(|name| {
            lookup(*name)
                .map(Field::string_value)
                .ok_or_else(|| CodecError::FieldNotFound((*name).to_string()))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::DictionaryBuilder;
    use crate::domain::value_objects::FieldType;

    fn dictionary() -> Dictionary {
        DictionaryBuilder::new("test")
            .field("BID", 22, FieldType::Price, 17)
            .field("ASK", 25, FieldType::Price, 17)
            .field("BIDSIZE", 30, FieldType::Integer, 15)
            .build()
            .unwrap()
    }

    fn buffer() -> MessageBuffer {
        MessageBuffer::from(
            &b"\x1c316\x1fXX\x1dTIBX.O\
               \x1e22\x1f+21.42\x1e30\x1f+7\x1e25\x1f+21.43\x1e22\x1f+21.44\x1c"[..],
        )
    }

    mod strategies {
        use super::*;

        #[test]
        fn all_strategies_agree_with_get() {
            let dictionary = dictionary();
            let lookup = FieldLookup::new(&dictionary);
            let buffer = buffer();
            let names = ["ASK", "BIDSIZE"];
            let expected: Vec<String> = names
                .iter()
                .map(|name| buffer.get(&dictionary, name).unwrap().string_value())
                .collect();
            for strategy in LookupStrategy::ALL {
                assert_eq!(lookup.values(&buffer, &names, strategy).unwrap(), expected, "{strategy}");
            }
        }

        #[test]
        fn missing_name_fails_every_strategy() {
            let dictionary = dictionary();
            let lookup = FieldLookup::new(&dictionary);
            for strategy in LookupStrategy::ALL {
                assert_eq!(
                    lookup.values(&buffer(), &["BID", "LAST"], strategy),
                    Err(CodecError::FieldNotFound("LAST".to_string())),
                    "{strategy}"
                );
            }
        }

        #[test]
        fn strategy_names() {
            assert_eq!(LookupStrategy::OrderedMap.to_string(), "ordered_map");
            assert_eq!(LookupStrategy::default(), LookupStrategy::Direct);
        }
    }

    mod scans {
        use super::*;

        #[test]
        fn first_occurrence_wins_for_named_lookups() {
            let dictionary = dictionary();
            let lookup = FieldLookup::new(&dictionary);
            assert_eq!(lookup.find_first(&buffer(), &["BID"]).unwrap(), ["21.42"]);
            assert_eq!(lookup.get(&buffer(), "BID").unwrap().string_value(), "21.42");
        }

        #[test]
        fn last_occurrence_wins_for_collect_all() {
            let dictionary = dictionary();
            let all: HashMap<String, Field> = FieldLookup::new(&dictionary).collect_all(&buffer()).unwrap();
            assert_eq!(all.len(), 3);
            assert_eq!(all["BID"].string_value(), "21.44");
        }

        #[test]
        fn collect_named_stops_before_malformed_tail() {
            let dictionary = dictionary();
            let lookup = FieldLookup::new(&dictionary);
            let buffer = MessageBuffer::from(
                &b"\x1c316\x1fXX\x1dTIBX.O\x1e22\x1f+21.42\x1e25\x1f+21.43\x1e30\x1fbad\x1c"[..],
            );

            let map: BTreeMap<String, String> = lookup.collect_named(&buffer, &["ASK", "BID"]).unwrap();
            assert_eq!(map.len(), 2);
            assert_eq!(map["ASK"], "21.43");

            let full: CodecResult<HashMap<String, Field>> = lookup.collect_all(&buffer);
            assert!(matches!(full, Err(CodecError::MalformedField { .. })));
        }

        #[test]
        fn collect_named_skips_absent_names() {
            let dictionary = dictionary();
            let map: HashMap<String, String> = FieldLookup::new(&dictionary)
                .collect_named(&buffer(), &["ASK", "LAST"])
                .unwrap();
            assert_eq!(map.len(), 1);
            assert!(!map.contains_key("LAST"));
        }

        #[test]
        fn empty_request_decodes_nothing() {
            let dictionary = dictionary();
            let garbage = MessageBuffer::from(&b"not a message"[..]);
            let map: HashMap<String, String> =
                FieldLookup::new(&dictionary).collect_named(&garbage, &[]).unwrap();
            assert!(map.is_empty());
        }
    }
}
