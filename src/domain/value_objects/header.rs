//! # Message Header
//!
//! Message-level metadata framing every MarketFeed record: record type,
//! two-character tag, routing key (RIC) and the optional record
//! transaction level.
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::value_objects::enums::RecordType;
//! use mfeed::domain::value_objects::header::{MessageHeader, TransactionLevel};
//!
//! let header = MessageHeader::new(RecordType::Update, "XX", "TIBX.O")
//!     .with_transaction_level(TransactionLevel::new(31424));
//!
//! assert_eq!(header.ric(), "TIBX.O");
//! assert_eq!(header.transaction_level().map(TransactionLevel::get), Some(31424));
//! ```

use super::enums::RecordType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record transaction level (RTL).
///
/// Increases with every transaction applied to a record, so consumers can
/// detect gaps and stale updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLevel(u32);

impl TransactionLevel {
    /// Creates a transaction level.
    #[inline]
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the following level, wrapping at `u32::MAX`.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for TransactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHeader {
    record_type: RecordType,
    tag: String,
    ric: String,
    transaction_level: Option<TransactionLevel>,
}

impl MessageHeader {
    /// Creates a header without a transaction level.
    #[must_use]
    pub fn new(record_type: RecordType, tag: impl Into<String>, ric: impl Into<String>) -> Self {
        Self {
            record_type,
            tag: tag.into(),
            ric: ric.into(),
            transaction_level: None,
        }
    }

    /// Sets the record transaction level.
    #[must_use]
    pub fn with_transaction_level(mut self, level: TransactionLevel) -> Self {
        self.transaction_level = Some(level);
        self
    }

    /// Returns the record type.
    #[inline]
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Returns the tag used to correlate responses with requests.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the routing key (RIC).
    #[inline]
    #[must_use]
    pub fn ric(&self) -> &str {
        &self.ric
    }

    /// Returns the record transaction level, if present.
    #[inline]
    #[must_use]
    pub fn transaction_level(&self) -> Option<TransactionLevel> {
        self.transaction_level
    }
}

impl fmt::Display for MessageHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.record_type, self.ric, self.tag)?;
        if let Some(level) = self.transaction_level {
            write!(f, " rtl={level}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_level_wraps() {
        assert_eq!(TransactionLevel::new(7).next().get(), 8);
        assert_eq!(TransactionLevel::new(u32::MAX).next().get(), 0);
    }

    #[test]
    fn display_includes_rtl() {
        let header = MessageHeader::new(RecordType::Update, "XX", "TIBX.O")
            .with_transaction_level(TransactionLevel::new(31424));
        assert_eq!(header.to_string(), "UPDATE TIBX.O [XX] rtl=31424");
    }

    #[test]
    fn display_without_rtl() {
        let header = MessageHeader::new(RecordType::Image, "AB", "IBM.N");
        assert_eq!(header.to_string(), "IMAGE IBM.N [AB]");
    }
}
