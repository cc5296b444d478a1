//! # Domain Layer
//!
//! Wire-independent model of MarketFeed messages: field ids, type hints,
//! values, fields and the field dictionary.

pub mod entities;
pub mod errors;
pub mod value_objects;
