//! # Dictionary Infrastructure
//!
//! Parsing and load-once ownership of the field dictionary.
//!
//! - [`DictionaryLoader`]: loads the process dictionary exactly once
//! - [`DictionarySource`]: supplies resources by name
//! - [`parse_field_definitions`]: appendix A field table
//! - [`parse_enum_tables`]: enumerated-value table

pub mod appendix_a;
pub mod enum_type;
pub mod loader;
pub mod source;

pub use appendix_a::parse_field_definitions;
pub use enum_type::{EnumBlock, parse_enum_tables};
pub use loader::DictionaryLoader;
pub use source::{DictionarySource, InMemoryDictionarySource};
