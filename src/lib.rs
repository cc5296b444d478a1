//! # mfeed
//!
//! Codec for MarketFeed, a delimiter-framed market-data wire format.
//!
//! A message is a header followed by any number of field records:
//!
//! ```text
//! FS type US tag GS ric [US rtl] { RS fid-or-name US value } FS
//! ```
//!
//! Field names are mapped to numeric ids through a data dictionary loaded
//! once per process. Values are typed by a per-field [`TypeHint`]; scaled
//! numbers are exact decimals, so `21.42` survives any number of
//! encode/decode passes unchanged.
//!
//! ## Architecture
//!
//! - [`domain`]: fields, values, hints, headers and the dictionary
//! - [`infrastructure`]: dictionary parsing and loading, configuration, and
//!   the wire codec (builder, buffer, cursor)
//! - [`application`]: codec context and field lookup strategies
//!
//! ## Cost model
//!
//! Appending a field is amortised O(1). Named lookup with
//! [`MessageBuffer::get`] is O(position of the field) and re-scans from the
//! first field on every call; iterating with a [`FieldCursor`] visits every
//! field once.
//!
//! ## Example
//!
//! ```
//! use mfeed::domain::entities::DictionaryBuilder;
//! use mfeed::domain::value_objects::{FieldType, MessageHeader, RecordType, TypeHint};
//! use mfeed::infrastructure::mfeed::MessageBuilder;
//! use rust_decimal::Decimal;
//!
//! let dictionary = DictionaryBuilder::new("demo")
//!     .field("BID", 22, FieldType::Price, 17)
//!     .field("BIDSIZE", 30, FieldType::Integer, 15)
//!     .field("BID_MMID1", 293, FieldType::Alphanumeric, 4)
//!     .build()
//!     .unwrap();
//!
//! let header = MessageHeader::new(RecordType::Update, "XX", "TIBX.O");
//! let mut builder = MessageBuilder::new(&dictionary, &header).unwrap();
//! builder
//!     .append("BID", Decimal::new(2142, 2), TypeHint::Decimal(2))
//!     .unwrap()
//!     .append("BIDSIZE", 7_i64, TypeHint::DENOM_NONE)
//!     .unwrap()
//!     .append("BID_MMID1", "NAS", TypeHint::FixedString(4))
//!     .unwrap();
//! let buffer = builder.finish();
//!
//! assert_eq!(buffer.get(&dictionary, "BID").unwrap().string_value(), "21.42");
//! assert_eq!(buffer.get(&dictionary, "BIDSIZE").unwrap().string_value(), "7");
//! assert_eq!(buffer.get(&dictionary, "BID_MMID1").unwrap().string_value(), "NAS ");
//! ```
//!
//! [`TypeHint`]: domain::value_objects::TypeHint
//! [`MessageBuffer::get`]: infrastructure::mfeed::MessageBuffer::get
//! [`FieldCursor`]: infrastructure::mfeed::FieldCursor

pub mod application;
pub mod domain;
pub mod infrastructure;
