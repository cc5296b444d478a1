//! # Type Hints
//!
//! Per-value formatting directives.
//!
//! A [`TypeHint`] says how a value is rendered on the wire. The decimal
//! count of a scaled numeric travels in the hint (`Decimal(n)`), never in
//! dictionary metadata: the encoder writes exactly `n` fractional digits
//! and the decoder recovers `n` from the literal it reads.

use super::enums::{FieldType, ParseEnumError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest decimal count accepted by [`TypeHint::Decimal`].
pub const MAX_DECIMAL_PLACES: u8 = 9;

/// How a field value is formatted on the wire.
///
/// # Examples
///
/// ```
/// use mfeed::domain::value_objects::enums::FieldType;
/// use mfeed::domain::value_objects::type_hint::TypeHint;
///
/// assert!(TypeHint::Decimal(2).accepts(FieldType::Price));
/// assert!(!TypeHint::Decimal(2).accepts(FieldType::Integer));
/// assert_eq!(TypeHint::DENOM_NONE, TypeHint::Decimal(0));
/// assert_eq!("DECIMAL_2".parse::<TypeHint>().unwrap(), TypeHint::Decimal(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeHint {
    /// Sign-prefixed fixed point with exactly this many decimals.
    Decimal(u8),
    /// Literal numeric code of an enumerated field.
    Enumerated,
    /// Exactly this many bytes, right padded with spaces.
    FixedString(u16),
    /// `HH:MM`.
    TimeMinutes,
    /// `HH:MM:SS`.
    TimeSeconds,
    /// `DD MMM YYYY`.
    Date,
    /// Verbatim bytes.
    Text,
}

impl TypeHint {
    /// Scaled numeric with no decimals.
    pub const DENOM_NONE: Self = Self::Decimal(0);

    /// Returns true when values with this hint can be stored in a field of
    /// the given dictionary type.
    #[must_use]
    pub const fn accepts(self, field_type: FieldType) -> bool {
        match (self, field_type) {
            (Self::Decimal(_), FieldType::Price) => true,
            (Self::Decimal(0), FieldType::Integer) => true,
            (Self::Enumerated, FieldType::Enumerated) => true,
            (Self::FixedString(_), FieldType::Alphanumeric) => true,
            (Self::TimeMinutes, FieldType::Time) => true,
            (Self::TimeSeconds, FieldType::TimeSeconds) => true,
            (Self::Date, FieldType::Date) => true,
            (Self::Text, FieldType::Binary) => true,
            _ => false,
        }
    }

    /// Returns the decimal count for numeric hints.
    #[inline]
    #[must_use]
    pub const fn decimal_places(self) -> Option<u8> {
        match self {
            Self::Decimal(places) => Some(places),
            _ => None,
        }
    }

    /// Returns true if the hint itself is well formed.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        match self {
            Self::Decimal(places) => places <= MAX_DECIMAL_PLACES,
            _ => true,
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(0) => write!(f, "DENOM_NONE"),
            Self::Decimal(places) => write!(f, "DECIMAL_{places}"),
            Self::Enumerated => write!(f, "ENUMERATED"),
            Self::FixedString(width) => write!(f, "FIXED_STRING_{width}"),
            Self::TimeMinutes => write!(f, "TIME_MINUTES"),
            Self::TimeSeconds => write!(f, "TIME_SECONDS"),
            Self::Date => write!(f, "DATE"),
            Self::Text => write!(f, "TEXT"),
        }
    }
}

impl FromStr for TypeHint {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase().replace('-', "_");
        let invalid = || ParseEnumError::InvalidValue("TypeHint", s.to_string());
        match upper.as_str() {
            "DENOM_NONE" => Ok(Self::DENOM_NONE),
            "ENUMERATED" => Ok(Self::Enumerated),
            "TIME_MINUTES" => Ok(Self::TimeMinutes),
            "TIME_SECONDS" => Ok(Self::TimeSeconds),
            "DATE" => Ok(Self::Date),
            "TEXT" => Ok(Self::Text),
            other => {
                if let Some(places) = other.strip_prefix("DECIMAL_") {
                    let places = places.parse::<u8>().map_err(|_| invalid())?;
                    let hint = Self::Decimal(places);
                    return if hint.is_valid() { Ok(hint) } else { Err(invalid()) };
                }
                if let Some(width) = other.strip_prefix("FIXED_STRING_") {
                    return width.parse::<u16>().map(Self::FixedString).map_err(|_| invalid());
                }
                Err(invalid())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_matrix() {
        assert!(TypeHint::Decimal(4).accepts(FieldType::Price));
        assert!(TypeHint::DENOM_NONE.accepts(FieldType::Integer));
        assert!(TypeHint::Enumerated.accepts(FieldType::Enumerated));
        assert!(TypeHint::FixedString(4).accepts(FieldType::Alphanumeric));
        assert!(TypeHint::TimeSeconds.accepts(FieldType::TimeSeconds));
        assert!(TypeHint::TimeMinutes.accepts(FieldType::Time));
        assert!(TypeHint::Date.accepts(FieldType::Date));
        assert!(TypeHint::Text.accepts(FieldType::Binary));

        assert!(!TypeHint::Text.accepts(FieldType::Alphanumeric));
        assert!(!TypeHint::TimeSeconds.accepts(FieldType::Time));
        assert!(!TypeHint::Enumerated.accepts(FieldType::Integer));
    }

    #[test]
    fn display_parse_agree() {
        for hint in [
            TypeHint::Decimal(0),
            TypeHint::Decimal(2),
            TypeHint::Enumerated,
            TypeHint::FixedString(6),
            TypeHint::TimeMinutes,
            TypeHint::TimeSeconds,
            TypeHint::Date,
            TypeHint::Text,
        ] {
            assert_eq!(hint.to_string().parse::<TypeHint>().unwrap(), hint);
        }
    }

    #[test]
    fn rejects_excess_decimals() {
        assert!(!TypeHint::Decimal(10).is_valid());
        assert!("DECIMAL_12".parse::<TypeHint>().is_err());
    }

    #[test]
    fn decimal_places() {
        assert_eq!(TypeHint::Decimal(2).decimal_places(), Some(2));
        assert_eq!(TypeHint::Date.decimal_places(), None);
    }
}
