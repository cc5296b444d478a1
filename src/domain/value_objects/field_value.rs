//! # Field Values
//!
//! Typed field values and their wire text.
//!
//! This module provides:
//! - [`FieldValue`] - A decoded or to-be-encoded value
//! - [`ValueError`] - Why a value cannot be rendered or read under a hint
//! - [`scan_fixed_point`] - Exact parsing of sign-prefixed fixed-point text
//! - [`format_fixed_point`] - Exact rendering with a fixed decimal count
//!
//! Numbers are held as [`Decimal`], so `21.42` stays `21.42` through any
//! number of encode/decode passes.
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::value_objects::field_value::{format_fixed_point, scan_fixed_point};
//! use rust_decimal::Decimal;
//!
//! let (value, places) = scan_fixed_point("+21.42").unwrap();
//! assert_eq!(value, Decimal::new(2142, 2));
//! assert_eq!(places, 2);
//! assert_eq!(format_fixed_point(value, places).unwrap(), "+21.42");
//! ```

use super::type_hint::{MAX_DECIMAL_PLACES, TypeHint};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const TIME_MINUTES_FORMAT: &str = "%H:%M";
const TIME_SECONDS_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%d %b %Y";

/// Why a value cannot be rendered or read under a given hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value kind cannot be carried with this hint.
    #[error("{kind} value is incompatible with hint {hint}")]
    Incompatible {
        /// Kind of the offending value.
        kind: &'static str,
        /// Requested hint.
        hint: TypeHint,
    },

    /// The hint itself is out of range.
    #[error("invalid hint {0}")]
    InvalidHint(TypeHint),

    /// Text is not a fixed-point number.
    #[error("not a fixed-point number: {0:?}")]
    NotNumeric(String),

    /// The number has more significant decimals than the hint allows.
    #[error("{value} does not fit in {places} decimal places")]
    Precision {
        /// Offending value.
        value: String,
        /// Decimal places allowed by the hint.
        places: u8,
    },

    /// Floating-point input is NaN or infinite.
    #[error("non-finite floating-point value")]
    NotFinite,

    /// Enumerated codes are unsigned decimal digits.
    #[error("not an enumerated code: {0:?}")]
    NotEnumerated(String),

    /// Text is longer than the fixed width.
    #[error("{len} bytes exceed fixed width {width}")]
    TooWide {
        /// Width allowed by the hint.
        width: u16,
        /// Actual length in bytes.
        len: usize,
    },

    /// Text is not a time of day in the expected layout.
    #[error("not a time of day: {0:?}")]
    BadTime(String),

    /// Text is not a date in the expected layout.
    #[error("not a date: {0:?}")]
    BadDate(String),

    /// Wire bytes are not UTF-8.
    #[error("value is not valid UTF-8")]
    Encoding,
}

/// A field value.
///
/// `Blank` is the empty wire value and is legal under every hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Empty value.
    Blank,
    /// Fixed-point number.
    Decimal(Decimal),
    /// Character data or an enumerated code.
    Text(String),
    /// Time of day.
    Time(NaiveTime),
    /// Calendar date.
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns a short name of the value kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Time(_) => "time",
            Self::Date(_) => "date",
        }
    }

    /// Returns true for the empty value.
    #[inline]
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Returns the number, if this is one.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the time of day, if this is one.
    #[must_use]
    pub const fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(time) => Some(*time),
            _ => None,
        }
    }

    /// Returns the date, if this is one.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Converts a floating-point number to a decimal rounded to `places`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotFinite`] for NaN or infinities and
    /// [`ValueError::NotNumeric`] when the magnitude is out of range.
    pub fn from_real(value: f64, places: u8) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NotFinite);
        }
        let decimal =
            Decimal::from_f64(value).ok_or_else(|| ValueError::NotNumeric(value.to_string()))?;
        Ok(Self::Decimal(decimal.round_dp_with_strategy(
            u32::from(places),
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// Brings a value into the canonical shape for `hint`.
    ///
    /// Text is parsed into numbers, times and dates where the hint calls
    /// for them, fixed-width text is padded, and empty free text becomes
    /// [`FieldValue::Blank`], which is how it reads back. Values that cannot be
    /// normalised are returned unchanged; rendering them reports the error.
    #[must_use]
    pub fn normalized(self, hint: TypeHint) -> Self {
        match (self, hint) {
            (Self::Text(text), TypeHint::Text) if text.is_empty() => Self::Blank,
            (Self::Text(text), TypeHint::Decimal(_)) => match scan_fixed_point(&text) {
                Some((value, _)) => Self::Decimal(value),
                None => Self::Text(text),
            },
            (Self::Text(text), TypeHint::FixedString(width)) => {
                Self::Text(pad_fixed(text, usize::from(width)))
            }
            (Self::Text(text), TypeHint::TimeMinutes | TypeHint::TimeSeconds | TypeHint::Date) => {
                match parse_text(&text, hint) {
                    Ok(value) => value,
                    Err(_) => Self::Text(text),
                }
            }
            (value, _) => value,
        }
    }

    /// Renders the value as wire text under `hint`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the value kind does not suit the hint
    /// or does not fit it (too many decimals, too wide, sub-second time).
    pub fn to_wire(&self, hint: TypeHint) -> Result<String, ValueError> {
        if !hint.is_valid() {
            return Err(ValueError::InvalidHint(hint));
        }
        let incompatible = || ValueError::Incompatible {
            kind: self.kind(),
            hint,
        };
        match (self, hint) {
            (Self::Blank, _) => Ok(String::new()),
            (Self::Decimal(value), TypeHint::Decimal(places)) => format_fixed_point(*value, places),
            (Self::Text(text), TypeHint::Decimal(places)) => {
                let (value, _) =
                    scan_fixed_point(text).ok_or_else(|| ValueError::NotNumeric(text.clone()))?;
                format_fixed_point(value, places)
            }
            (Self::Text(text), TypeHint::Enumerated) => {
                if is_enumerated_code(text) {
                    Ok(text.clone())
                } else {
                    Err(ValueError::NotEnumerated(text.clone()))
                }
            }
            (Self::Text(text), TypeHint::FixedString(width)) => {
                if text.len() > usize::from(width) {
                    return Err(ValueError::TooWide {
                        width,
                        len: text.len(),
                    });
                }
                Ok(pad_fixed(text.clone(), usize::from(width)))
            }
            (Self::Text(text), TypeHint::Text) => Ok(text.clone()),
            (Self::Text(text), TypeHint::TimeMinutes | TypeHint::TimeSeconds | TypeHint::Date) => {
                parse_text(text, hint)?.to_wire(hint)
            }
            (Self::Time(time), TypeHint::TimeMinutes) => {
                if time.second() != 0 || time.nanosecond() != 0 {
                    return Err(ValueError::BadTime(time.to_string()));
                }
                Ok(time.format(TIME_MINUTES_FORMAT).to_string())
            }
            (Self::Time(time), TypeHint::TimeSeconds) => {
                if time.nanosecond() != 0 {
                    return Err(ValueError::BadTime(time.to_string()));
                }
                Ok(time.format(TIME_SECONDS_FORMAT).to_string())
            }
            (Self::Date(date), TypeHint::Date) => {
                if !(0..=9999).contains(&date.year()) {
                    return Err(ValueError::BadDate(date.to_string()));
                }
                Ok(date.format(DATE_FORMAT).to_string().to_uppercase())
            }
            _ => Err(incompatible()),
        }
    }

    /// Reads wire bytes under `hint`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the bytes are not valid for the hint.
    pub fn from_wire(raw: &[u8], hint: TypeHint) -> Result<Self, ValueError> {
        if raw.is_empty() {
            return Ok(Self::Blank);
        }
        let text = std::str::from_utf8(raw).map_err(|_| ValueError::Encoding)?;
        parse_text(text, hint)
    }

    /// Human-readable text under `hint`: numbers without the `+` prefix,
    /// times and dates in their wire layout, text verbatim.
    #[must_use]
    pub fn display_with(&self, hint: TypeHint) -> String {
        match (self, hint) {
            (Self::Time(time), TypeHint::TimeMinutes) => {
                time.format(TIME_MINUTES_FORMAT).to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Time(time) => write!(f, "{}", time.format(TIME_SECONDS_FORMAT)),
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT).to_string().to_uppercase()),
        }
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Decimal(Decimal::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Decimal(Decimal::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Parses sign-prefixed fixed-point text such as `+21.42`, `-0.5` or `7`.
///
/// Returns the exact value and the number of fractional digits, or `None`
/// if the text is not of the form `[+-]digits[.digits]` or carries more
/// than [`MAX_DECIMAL_PLACES`] decimals.
#[must_use]
pub fn scan_fixed_point(text: &str) -> Option<(Decimal, u8)> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'+') => (false, text.get(1..)?),
        Some(b'-') => (true, text.get(1..)?),
        _ => (false, text),
    };
    let (whole, fraction) = match body.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (body, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.is_none_or(all_digits) {
        return None;
    }
    let places = u8::try_from(fraction.map_or(0, str::len)).ok()?;
    if places > MAX_DECIMAL_PLACES {
        return None;
    }
    let mut value = Decimal::from_str(body).ok()?;
    if negative {
        value.set_sign_negative(true);
    }
    Some((value, places))
}

/// Renders `value` with a sign prefix and exactly `places` decimals.
///
/// # Errors
///
/// Returns [`ValueError::Precision`] if the value has significant digits
/// beyond `places` or cannot be represented at that scale.
pub fn format_fixed_point(value: Decimal, places: u8) -> Result<String, ValueError> {
    let precision = || ValueError::Precision {
        value: value.to_string(),
        places,
    };
    if places > MAX_DECIMAL_PLACES {
        return Err(ValueError::InvalidHint(TypeHint::Decimal(places)));
    }
    if value.round_dp(u32::from(places)) != value {
        return Err(precision());
    }
    let mut scaled = value;
    scaled.rescale(u32::from(places));
    if scaled != value || scaled.scale() != u32::from(places) {
        return Err(precision());
    }
    let sign = if scaled.is_sign_negative() && !scaled.is_zero() {
        '-'
    } else {
        '+'
    };
    Ok(format!("{sign}{}", scaled.abs()))
}

fn parse_text(text: &str, hint: TypeHint) -> Result<FieldValue, ValueError> {
    match hint {
        TypeHint::Decimal(_) => scan_fixed_point(text)
            .map(|(value, _)| FieldValue::Decimal(value))
            .ok_or_else(|| ValueError::NotNumeric(text.to_string())),
        TypeHint::Enumerated => {
            if is_enumerated_code(text) {
                Ok(FieldValue::Text(text.to_string()))
            } else {
                Err(ValueError::NotEnumerated(text.to_string()))
            }
        }
        TypeHint::FixedString(_) | TypeHint::Text => Ok(FieldValue::Text(text.to_string())),
        TypeHint::TimeMinutes => NaiveTime::parse_from_str(text, TIME_MINUTES_FORMAT)
            .map(FieldValue::Time)
            .map_err(|_| ValueError::BadTime(text.to_string())),
        TypeHint::TimeSeconds => NaiveTime::parse_from_str(text, TIME_SECONDS_FORMAT)
            .ok()
            .filter(|time| time.nanosecond() == 0)
            .map(FieldValue::Time)
            .ok_or_else(|| ValueError::BadTime(text.to_string())),
        TypeHint::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|_| ValueError::BadDate(text.to_string())),
    }
}

fn is_enumerated_code(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn pad_fixed(mut text: String, width: usize) -> String {
    while text.len() < width {
        text.push(' ');
    }
    text
}
