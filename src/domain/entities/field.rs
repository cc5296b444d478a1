//! # Field Entity
//!
//! A single named value inside a MarketFeed message.
//!
//! A [`Field`] built by hand and a [`Field`] produced by the decoder are
//! interchangeable: re-encoding a decoded field yields the exact bytes it
//! was read from, provided those bytes were canonical. The canonical
//! spellings are the ones the encoder writes. Numbers always carry a sign,
//! and zero is `+`. Ids and header numbers have no leading zeros. The
//! decoder also accepts other spellings such as `7`, `-0.00` or record type
//! `0316`, and those come back canonical (`+7`, `+0.00`, `316`).
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::entities::field::Field;
//! use mfeed::domain::value_objects::{FieldValue, TypeHint};
//! use rust_decimal::Decimal;
//!
//! let bid = Field::new("BID", Decimal::new(2142, 2), TypeHint::Decimal(2));
//! assert_eq!(bid.string_value(), "21.42");
//! assert_eq!(bid.wire_value().unwrap(), "+21.42");
//!
//! let mmid = Field::new("BID_MMID1", "NAS", TypeHint::FixedString(4));
//! assert_eq!(mmid.value(), &FieldValue::from("NAS "));
//! ```

use crate::domain::value_objects::{FieldId, FieldValue, TypeHint, ValueError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A named, typed field value.
///
/// # Invariants
///
/// - Immutable once constructed
/// - Equality is by name, value and hint; the id is not part of identity
///   so fields built without dictionary access compare equal to decoded ones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name (dictionary acronym).
    name: String,
    /// Dictionary id, when the field is mapped.
    id: Option<FieldId>,
    /// Wire formatting directive.
    hint: TypeHint,
    /// The value.
    value: FieldValue,
}

impl Field {
    /// Creates a field without a dictionary id.
    ///
    /// The value is normalised for the hint: numeric text becomes a decimal,
    /// time and date text is parsed, fixed-width text is padded.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>, hint: TypeHint) -> Self {
        Self {
            name: name.into(),
            id: None,
            hint,
            value: value.into().normalized(hint),
        }
    }

    /// Builds a field from already decoded parts, skipping normalisation.
    pub(crate) fn decoded(
        name: String,
        id: Option<FieldId>,
        hint: TypeHint,
        value: FieldValue,
    ) -> Self {
        Self {
            name,
            id,
            hint,
            value,
        }
    }

    /// Attaches a dictionary id.
    #[must_use]
    pub fn with_id(mut self, id: FieldId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the field name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dictionary id, if the field is mapped.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<FieldId> {
        self.id
    }

    /// Returns the type hint.
    #[inline]
    #[must_use]
    pub fn hint(&self) -> TypeHint {
        self.hint
    }

    /// Returns the value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Consumes the field, returning its value.
    #[must_use]
    pub fn into_value(self) -> FieldValue {
        self.value
    }

    /// Returns the human-readable value, e.g. `21.42` or `NAS `.
    #[must_use]
    pub fn string_value(&self) -> String {
        self.value.display_with(self.hint)
    }

    /// Returns the exact wire text, e.g. `+21.42`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if the value does not fit the hint.
    pub fn wire_value(&self) -> Result<String, ValueError> {
        self.value.to_wire(self.hint)
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.hint == other.hint
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.value.hash(state);
        self.hint.hash(state);
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} <{}>: {:?} ({})", self.name, id, self.string_value(), self.hint),
            None => write!(f, "{}: {:?} ({})", self.name, self.string_value(), self.hint),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    #[test]
    fn equality_ignores_id() {
        let a = Field::new("BID", Decimal::new(2142, 2), TypeHint::Decimal(2));
        let b = a.clone().with_id(FieldId::new(22));
        assert_eq!(a, b);
    }

    #[test]
    fn equality_includes_hint() {
        let a = Field::new("BIDSIZE", Decimal::new(7, 0), TypeHint::Decimal(0));
        let b = Field::new("BIDSIZE", Decimal::new(7, 0), TypeHint::Decimal(2));
        assert_ne!(a, b);
    }

    #[test]
    fn numeric_text_is_normalised() {
        let field = Field::new("BID", "+21.42", TypeHint::Decimal(2));
        assert_eq!(field.value().as_decimal(), Some(Decimal::new(2142, 2)));
    }

    #[test]
    fn time_text_is_normalised() {
        let field = Field::new("QUOTIM", "14:33:44", TypeHint::TimeSeconds);
        assert_eq!(
            field.value().as_time(),
            Some(NaiveTime::from_hms_opt(14, 33, 44).unwrap())
        );
        assert_eq!(field.string_value(), "14:33:44");
    }

    #[test]
    fn wire_value_uses_hint() {
        let field = Field::new("BIDSIZE", Decimal::new(7, 0), TypeHint::DENOM_NONE);
        assert_eq!(field.wire_value().unwrap(), "+7");
        assert_eq!(field.string_value(), "7");
    }

    #[test]
    fn display_shows_id_when_mapped() {
        let field = Field::new("PRC_QL_CD", "0", TypeHint::Enumerated).with_id(FieldId::new(118));
        assert_eq!(field.to_string(), "PRC_QL_CD <118>: \"0\" (ENUMERATED)");
    }

    #[test]
    fn serde_roundtrip() {
        let field = Field::new("BID", Decimal::new(2142, 2), TypeHint::Decimal(2))
            .with_id(FieldId::new(22));
        let json = serde_json::to_string(&field).unwrap();
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
        assert_eq!(back.id(), Some(FieldId::new(22)));
    }
}
