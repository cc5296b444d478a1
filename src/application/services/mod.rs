//! # Application Services
//!
//! Services that combine the dictionary, configuration and codec.
//!
//! This module provides application-level services including:
//! - [`CodecContext`]: Dictionary and configuration handed to codec operations
//! - [`FieldLookup`]: Named field access and its lookup strategies

pub mod codec_context;
pub mod field_lookup;

pub use codec_context::CodecContext;
pub use field_lookup::{FieldLookup, LookupStrategy};
