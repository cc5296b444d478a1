//! # Domain Enums
//!
//! Enumeration types for MarketFeed concepts.
//!
//! - [`FieldType`] - Field type declared by the field dictionary
//! - [`RecordType`] - Message-level record type code
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field type as declared in the field dictionary (appendix A vocabulary).
///
/// # Examples
///
/// ```
/// use mfeed::domain::value_objects::enums::FieldType;
///
/// let price: FieldType = "PRICE".parse().unwrap();
/// assert_eq!(price, FieldType::Price);
/// assert!(price.is_numeric());
/// assert_eq!(FieldType::TimeSeconds.to_string(), "TIME_SECONDS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    /// Whole number.
    Integer,
    /// Fixed-point price.
    Price,
    /// Fixed-width character data.
    Alphanumeric,
    /// Numeric code looked up in the enumerated-value table.
    Enumerated,
    /// Time of day, minute precision.
    Time,
    /// Time of day, second precision.
    TimeSeconds,
    /// Calendar date.
    Date,
    /// Opaque bytes carried verbatim.
    Binary,
}

impl FieldType {
    /// Returns true for types carried as fixed-point numbers.
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Price)
    }

    /// Returns the appendix A keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Price => "PRICE",
            Self::Alphanumeric => "ALPHANUMERIC",
            Self::Enumerated => "ENUMERATED",
            Self::Time => "TIME",
            Self::TimeSeconds => "TIME_SECONDS",
            Self::Date => "DATE",
            Self::Binary => "BINARY",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "INTEGER" => Ok(Self::Integer),
            "PRICE" => Ok(Self::Price),
            "ALPHANUMERIC" => Ok(Self::Alphanumeric),
            "ENUMERATED" => Ok(Self::Enumerated),
            "TIME" => Ok(Self::Time),
            "TIME_SECONDS" => Ok(Self::TimeSeconds),
            "DATE" => Ok(Self::Date),
            "BINARY" => Ok(Self::Binary),
            _ => Err(ParseEnumError::InvalidValue("FieldType", s.to_string())),
        }
    }
}

/// Record type carried in the message header.
///
/// Known codes get their own variant; anything else is preserved as
/// [`RecordType::Other`] so that unfamiliar messages still round-trip.
///
/// # Examples
///
/// ```
/// use mfeed::domain::value_objects::enums::RecordType;
///
/// assert_eq!(RecordType::from_code(316), RecordType::Update);
/// assert_eq!(RecordType::Image.code(), 340);
/// assert_eq!(RecordType::from_code(999), RecordType::Other(999));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    /// Full record image (340).
    Image,
    /// Incremental update (316).
    Update,
    /// Correction of a previous update (317).
    Correction,
    /// Closing run values (318).
    ClosingRun,
    /// Any other record type code.
    Other(u16),
}

impl RecordType {
    /// Maps a numeric code to a record type.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            340 => Self::Image,
            316 => Self::Update,
            317 => Self::Correction,
            318 => Self::ClosingRun,
            other => Self::Other(other),
        }
    }

    /// Returns the numeric code written on the wire.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Image => 340,
            Self::Update => 316,
            Self::Correction => 317,
            Self::ClosingRun => 318,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "IMAGE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Correction => write!(f, "CORRECTION"),
            Self::ClosingRun => write!(f, "CLOSING_RUN"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for RecordType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "IMAGE" => Ok(Self::Image),
            "UPDATE" => Ok(Self::Update),
            "CORRECTION" => Ok(Self::Correction),
            "CLOSING_RUN" => Ok(Self::ClosingRun),
            other => other
                .parse::<u16>()
                .map(Self::from_code)
                .map_err(|_| ParseEnumError::InvalidValue("RecordType", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
