//! # MarketFeed Codec
//!
//! Encoding and decoding of delimiter-framed MarketFeed messages.
//!
//! ```text
//! FS type US tag GS ric [US rtl] { RS fid-or-name US value } FS
//! ```
//!
//! This module provides:
//! - [`MessageBuilder`]: append-only encoder
//! - [`MessageBuffer`]: immutable framed bytes
//! - [`FieldCursor`]: forward-only decoder
//! - [`get`]: one-shot lookup by name, re-scanning on every call
//! - [`CodecError`]: encoding and decoding failures

pub mod buffer;
pub mod cursor;
pub mod encoder;
pub mod error;
pub mod separators;

pub use buffer::MessageBuffer;
pub use cursor::{CursorStatus, FieldCursor, Fields, UnknownFieldPolicy, get};
pub use encoder::{DEFAULT_CAPACITY, MessageBuilder};
pub use error::{CodecError, CodecResult};
