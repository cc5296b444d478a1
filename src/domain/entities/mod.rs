//! # Domain Entities
//!
//! ## Dictionary
//!
//! - [`Dictionary`]: read-only field name/id index
//! - [`FieldDefinition`]: one dictionary entry
//!
//! ## Message Content
//!
//! - [`Field`]: named, typed value inside a message

pub mod dictionary;
pub mod field;

pub use dictionary::{Dictionary, DictionaryBuilder, EnumValue, FieldDefinition};
pub use field::Field;
