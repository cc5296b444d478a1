//! # Message Builder
//!
//! Append-only encoder producing framed MarketFeed messages.
//!
//! Mapped fields are written by numeric id, unmapped fields by name. Every
//! append is validated before a single byte is written, so a failed append
//! leaves the message exactly as it was.
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::entities::DictionaryBuilder;
//! use mfeed::domain::value_objects::{FieldType, MessageHeader, RecordType, TypeHint};
//! use mfeed::infrastructure::mfeed::MessageBuilder;
//! use rust_decimal::Decimal;
//!
//! let dictionary = DictionaryBuilder::new("demo")
//!     .field("BID", 22, FieldType::Price, 17)
//!     .build()
//!     .unwrap();
//! let header = MessageHeader::new(RecordType::Update, "XX", "TIBX.O");
//!
//! let mut builder = MessageBuilder::new(&dictionary, &header).unwrap();
//! builder
//!     .append("BID", Decimal::new(2142, 2), TypeHint::Decimal(2))
//!     .unwrap();
//! let bytes = builder.serialize();
//! assert_eq!(&bytes[..], b"\x1c316\x1fXX\x1dTIBX.O\x1e22\x1f+21.42\x1c");
//! ```

use super::buffer::MessageBuffer;
use super::error::{CodecError, CodecResult};
use super::separators::{self, FS, GS, RS, US};
use crate::domain::entities::{Dictionary, Field};
use crate::domain::value_objects::{FieldId, FieldValue, MessageHeader, TypeHint};
use bytes::{BufMut, Bytes, BytesMut};

/// Initial buffer size used by [`MessageBuilder::new`].
pub const DEFAULT_CAPACITY: usize = 256;

/// Key a record is written under.
enum Key<'a> {
    Id(FieldId),
    Name(&'a str),
}

/// Builds one message.
///
/// Consumed by [`MessageBuilder::serialize`] or [`MessageBuilder::finish`],
/// after which the bytes are immutable.
#[derive(Debug)]
pub struct MessageBuilder<'d> {
    dictionary: &'d Dictionary,
    ric: String,
    buffer: BytesMut,
    field_count: usize,
}

impl<'d> MessageBuilder<'d> {
    /// Starts a message and writes its header.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] if the tag is not exactly two
    /// bytes, the RIC is empty, or header text contains a reserved byte.
    pub fn new(dictionary: &'d Dictionary, header: &MessageHeader) -> CodecResult<Self> {
        Self::with_capacity(dictionary, header, DEFAULT_CAPACITY)
    }

    /// Starts a message with a preallocated buffer of `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Same as [`MessageBuilder::new`].
    pub fn with_capacity(
        dictionary: &'d Dictionary,
        header: &MessageHeader,
        capacity: usize,
    ) -> CodecResult<Self> {
        if header.tag().len() != 2 {
            return Err(CodecError::invalid_value(
                "tag",
                format!("expected exactly 2 bytes, got {}", header.tag().len()),
            ));
        }
        if header.ric().is_empty() {
            return Err(CodecError::invalid_value("ric", "must not be empty"));
        }
        check_reserved("tag", header.tag())?;
        check_reserved("ric", header.ric())?;

        let mut buffer = BytesMut::with_capacity(capacity);
        buffer.put_u8(FS);
        buffer.put_slice(header.record_type().code().to_string().as_bytes());
        buffer.put_u8(US);
        buffer.put_slice(header.tag().as_bytes());
        buffer.put_u8(GS);
        buffer.put_slice(header.ric().as_bytes());
        if let Some(level) = header.transaction_level() {
            buffer.put_u8(US);
            buffer.put_slice(level.to_string().as_bytes());
        }

        Ok(Self {
            dictionary,
            ric: header.ric().to_string(),
            buffer,
            field_count: 0,
        })
    }

    /// Appends a field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] if the value does not fit the
    /// hint, the hint does not suit the dictionary type, the name could be
    /// mistaken for a numeric id, or a reserved byte would be written.
    pub fn append(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
        hint: TypeHint,
    ) -> CodecResult<&mut Self> {
        let value = value.into().normalized(hint);
        let key = self.key_for(name, hint)?;
        self.write(name, key, &value, hint)
    }

    /// Appends a floating-point number rounded to the hint's decimals.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] for non-decimal hints, non-finite
    /// values, and everything [`MessageBuilder::append`] rejects.
    pub fn append_real(&mut self, name: &str, value: f64, hint: TypeHint) -> CodecResult<&mut Self> {
        let places = hint.decimal_places().ok_or_else(|| {
            CodecError::invalid_value(name, format!("real values need a decimal hint, got {hint}"))
        })?;
        let value = FieldValue::from_real(value, places).map_err(|e| CodecError::invalid_value(name, e))?;
        self.append(name, value, hint)
    }

    /// Re-encodes a field, typically one produced by a cursor.
    ///
    /// A field carrying an id the dictionary does not define is written by
    /// that id.
    ///
    /// # Errors
    ///
    /// Same as [`MessageBuilder::append`].
    pub fn append_field(&mut self, field: &Field) -> CodecResult<&mut Self> {
        let key = match field.id() {
            Some(id) if self.dictionary.definition(id).is_none() => Key::Id(id),
            _ => self.key_for(field.name(), field.hint())?,
        };
        self.write(field.name(), key, field.value(), field.hint())
    }

    /// Returns the number of fields appended.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Returns the bytes written so far, without the trailing FS.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false: the header is written on construction.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes the trailing FS and returns the immutable bytes.
    #[must_use]
    pub fn serialize(mut self) -> Bytes {
        self.buffer.put_u8(FS);
        tracing::debug!(
            ric = %self.ric,
            fields = self.field_count,
            bytes = self.buffer.len(),
            "serialized message"
        );
        self.buffer.freeze()
    }

    /// Writes the trailing FS and wraps the bytes for decoding.
    #[must_use]
    pub fn finish(self) -> MessageBuffer {
        MessageBuffer::new(self.serialize())
    }

    fn key_for<'n>(&self, name: &'n str, hint: TypeHint) -> CodecResult<Key<'n>> {
        if let Some(definition) = self.dictionary.definition_by_name(name) {
            if !definition.accepts(hint) {
                return Err(CodecError::invalid_value(
                    name,
                    format!("hint {hint} does not suit {} field", definition.field_type()),
                ));
            }
            return Ok(Key::Id(definition.id()));
        }
        match name.as_bytes().first() {
            None => Err(CodecError::invalid_value("name", "field name must not be empty")),
            Some(b) if b.is_ascii_digit() || *b == b'-' => Err(CodecError::invalid_value(
                name,
                "unmapped field name would read as a field id",
            )),
            Some(_) if hint != TypeHint::Text => Err(CodecError::invalid_value(
                name,
                format!("unmapped field reads back as text, got hint {hint}"),
            )),
            Some(_) => {
                check_reserved(name, name)?;
                Ok(Key::Name(name))
            }
        }
    }

    fn write(
        &mut self,
        name: &str,
        key: Key<'_>,
        value: &FieldValue,
        hint: TypeHint,
    ) -> CodecResult<&mut Self> {
        let wire = value.to_wire(hint).map_err(|e| CodecError::invalid_value(name, e))?;
        check_reserved(name, &wire)?;

        self.buffer.put_u8(RS);
        match key {
            Key::Id(id) => self.buffer.put_slice(id.to_string().as_bytes()),
            Key::Name(name) => self.buffer.put_slice(name.as_bytes()),
        }
        self.buffer.put_u8(US);
        self.buffer.put_slice(wire.as_bytes());
        self.field_count += 1;
        Ok(self)
    }
}

fn check_reserved(field: &str, text: &str) -> CodecResult<()> {
    match separators::find_separator(text.as_bytes()) {
        Some(pos) => {
            let byte = text.as_bytes().get(pos).copied().unwrap_or_default();
            Err(CodecError::invalid_value(
                field,
                format!("reserved byte {} at position {pos}", separators::name(byte)),
            ))
        }
        None => Ok(()),
    }
}
