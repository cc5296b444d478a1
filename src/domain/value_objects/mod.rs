//! # Value Objects
//!
//! Immutable types with validation and wire semantics.
//!
//! ## Identity Types
//!
//! - [`FieldId`]: numeric field identifier assigned by the dictionary
//!
//! ## Formatting
//!
//! - [`TypeHint`]: how a value is rendered on the wire
//! - [`FieldValue`]: typed value with exact fixed-point numbers
//!
//! ## Message Framing
//!
//! - [`MessageHeader`]: record type, tag, RIC and transaction level
//!
//! ## Domain Enums
//!
//! - `FieldType`: dictionary-declared field type
//! - `RecordType`: message record type code

pub mod enums;
pub mod field_id;
pub mod field_value;
pub mod header;
pub mod type_hint;

pub use enums::{FieldType, ParseEnumError, RecordType};
pub use field_id::FieldId;
pub use field_value::{FieldValue, ValueError};
pub use header::{MessageHeader, TransactionLevel};
pub use type_hint::TypeHint;
