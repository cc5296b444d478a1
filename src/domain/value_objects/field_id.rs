//! # Field Identifier
//!
//! Numeric field identifier (FID) assigned by a field dictionary.
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::value_objects::field_id::FieldId;
//!
//! let bid = FieldId::new(22);
//! assert_eq!(bid.to_string(), "22");
//! assert_eq!("-22".parse::<FieldId>().unwrap().get(), -22);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a FID literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field id: {0:?}")]
pub struct ParseFieldIdError(pub String);

/// Numeric field identifier.
///
/// Stable within one dictionary. Negative values are legal and denote
/// locally defined fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(i16);

impl FieldId {
    /// Creates a field identifier.
    #[inline]
    #[must_use]
    pub const fn new(value: i16) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> i16 {
        self.0
    }

    /// Returns true for locally defined (negative) identifiers.
    #[inline]
    #[must_use]
    pub const fn is_local(self) -> bool {
        self.0 < 0
    }

    /// Parses a wire key of an optional `-` followed by ASCII digits.
    ///
    /// Returns `None` for anything else, including out-of-range values.
    #[must_use]
    pub fn from_wire(key: &[u8]) -> Option<Self> {
        let digits = key.strip_prefix(b"-").unwrap_or(key);
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        std::str::from_utf8(key).ok()?.parse::<i16>().ok().map(Self)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = ParseFieldIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s.trim().as_bytes()).ok_or_else(|| ParseFieldIdError(s.to_string()))
    }
}

impl From<i16> for FieldId {
    fn from(value: i16) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_and_negative() {
        assert_eq!(FieldId::from_wire(b"22"), Some(FieldId::new(22)));
        assert_eq!(FieldId::from_wire(b"-4"), Some(FieldId::new(-4)));
        assert!(FieldId::new(-4).is_local());
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!(FieldId::from_wire(b""), None);
        assert_eq!(FieldId::from_wire(b"-"), None);
        assert_eq!(FieldId::from_wire(b"+22"), None);
        assert_eq!(FieldId::from_wire(b"2a"), None);
        assert_eq!(FieldId::from_wire(b"BID"), None);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(FieldId::from_wire(b"32768"), None);
        assert!("40000".parse::<FieldId>().is_err());
    }

    #[test]
    fn display_matches_wire() {
        let id: FieldId = "1025".parse().unwrap();
        assert_eq!(id.to_string(), "1025");
    }
}
