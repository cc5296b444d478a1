//! # Application Layer
//!
//! Services wiring the field dictionary and the wire codec together.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
