//! # Message Buffer
//!
//! Owns the framed bytes of one message and parses its frame on demand.
//!
//! Layout:
//! ```text
//! FS type US tag GS ric [US rtl] { RS fid-or-name US value } FS
//! ```
//!
//! Constructing a [`MessageBuffer`] never fails and never parses; framing
//! errors surface from the cursor's `first` call or from
//! [`MessageBuffer::header`].

use super::cursor::{FieldCursor, Fields, get};
use super::error::{CodecError, CodecResult};
use super::separators::{self, FS, GS, RS, US};
use crate::domain::entities::{Dictionary, Field};
use crate::domain::value_objects::{MessageHeader, RecordType, TransactionLevel};
use bytes::Bytes;

/// Immutable framed message bytes.
///
/// Cloning is cheap: the underlying storage is reference counted, so any
/// number of readers can share one buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageBuffer {
    bytes: Bytes,
}

impl MessageBuffer {
    /// Wraps framed bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Returns the raw bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a shared handle to the bytes.
    #[inline]
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// Returns the length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if there are no bytes at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Parses and returns the message header.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedHeader`] or [`CodecError::MalformedField`]
    /// if the frame is invalid.
    pub fn header(&self) -> CodecResult<MessageHeader> {
        parse_frame(&self.bytes).map(|frame| frame.header)
    }

    /// Looks up one field by name.
    ///
    /// Scans from the first field on every call: O(position of the field).
    /// Prefer a [`FieldCursor`] when reading several fields.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldNotFound`] if no field has that name, or
    /// the first decoding error met before it.
    pub fn get(&self, dictionary: &Dictionary, name: &str) -> CodecResult<Field> {
        get(dictionary, self, name)
    }

    /// Iterates over every field in insertion order.
    ///
    /// The iterator yields one error at most and then stops.
    #[must_use]
    pub fn fields<'d>(&self, dictionary: &'d Dictionary) -> Fields<'d> {
        Fields::new(FieldCursor::new(dictionary), self.clone())
    }
}

impl From<Bytes> for MessageBuffer {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for MessageBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&'static [u8]> for MessageBuffer {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(bytes))
    }
}

impl AsRef<[u8]> for MessageBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parsed frame: header plus the byte range holding the field records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) header: MessageHeader,
    /// Offset of the first RS, or of the closing FS when there are no fields.
    pub(crate) fields_start: usize,
    /// Offset of the closing FS.
    pub(crate) fields_end: usize,
}

pub(crate) fn parse_frame(bytes: &[u8]) -> CodecResult<Frame> {
    if bytes.first() != Some(&FS) {
        return Err(CodecError::MalformedHeader(
            "message must start with FS".to_string(),
        ));
    }
    let fields_end = bytes.len() - 1;
    if fields_end == 0 || bytes.last() != Some(&FS) {
        return Err(CodecError::malformed(
            bytes.len(),
            "message truncated: missing trailing FS",
        ));
    }
    let body = bytes.get(1..fields_end).unwrap_or_default();
    let header_len = body.iter().position(|&b| b == RS).unwrap_or(body.len());
    let header = parse_header(body.get(..header_len).unwrap_or_default())?;

    Ok(Frame {
        header,
        fields_start: 1 + header_len,
        fields_end,
    })
}

fn parse_header(header: &[u8]) -> CodecResult<MessageHeader> {
    let malformed = |reason: &str| CodecError::MalformedHeader(reason.to_string());

    let gs = header
        .iter()
        .position(|&b| b == GS)
        .ok_or_else(|| malformed("missing GS after tag"))?;
    let (left, right) = (
        header.get(..gs).unwrap_or_default(),
        header.get(gs + 1..).unwrap_or_default(),
    );

    let (type_digits, tag) =
        split_unit(left).ok_or_else(|| malformed("missing US between record type and tag"))?;
    let code = parse_digits::<u16>(type_digits)
        .ok_or_else(|| malformed("record type must be decimal digits"))?;
    let tag = header_text(tag, "tag")?;

    let (ric, level) = match split_unit(right) {
        Some((ric, level)) => {
            let level = parse_digits::<u32>(level)
                .ok_or_else(|| malformed("transaction level must be decimal digits"))?;
            (ric, Some(TransactionLevel::new(level)))
        }
        None => (right, None),
    };
    let ric = header_text(ric, "ric")?;
    if ric.is_empty() {
        return Err(malformed("empty ric"));
    }

    let header = MessageHeader::new(RecordType::from_code(code), tag, ric);
    Ok(match level {
        Some(level) => header.with_transaction_level(level),
        None => header,
    })
}

fn split_unit(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let us = bytes.iter().position(|&b| b == US)?;
    Some((bytes.get(..us)?, bytes.get(us + 1..)?))
}

fn parse_digits<T: std::str::FromStr>(bytes: &[u8]) -> Option<T> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

fn header_text<'a>(bytes: &'a [u8], what: &str) -> CodecResult<&'a str> {
    if let Some(pos) = separators::find_separator(bytes) {
        let byte = bytes.get(pos).copied().unwrap_or_default();
        return Err(CodecError::MalformedHeader(format!(
            "unexpected {} in {what}",
            separators::name(byte)
        )));
    }
    std::str::from_utf8(bytes)
        .map_err(|_| CodecError::MalformedHeader(format!("{what} is not valid UTF-8")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const UPDATE: &[u8] = b"\x1c316\x1fXX\x1dTIBX.O\x1f31424\x1e22\x1f+21.42\x1c";

    #[test]
    fn parses_header_with_rtl() {
        let header = MessageBuffer::from(UPDATE).header().unwrap();
        assert_eq!(header.record_type(), RecordType::Update);
        assert_eq!(header.tag(), "XX");
        assert_eq!(header.ric(), "TIBX.O");
        assert_eq!(header.transaction_level(), Some(TransactionLevel::new(31424)));
    }

    #[test]
    fn parses_header_without_rtl_or_fields() {
        let frame = parse_frame(b"\x1c340\x1fAB\x1dIBM.N\x1c").unwrap();
        assert_eq!(frame.header.record_type(), RecordType::Image);
        assert_eq!(frame.header.transaction_level(), None);
        assert_eq!(frame.fields_start, frame.fields_end);
    }

    #[test]
    fn fields_range_starts_at_first_rs() {
        let frame = parse_frame(UPDATE).unwrap();
        assert_eq!(UPDATE.get(frame.fields_start), Some(&RS));
        assert_eq!(frame.fields_end, UPDATE.len() - 1);
    }

    #[test]
    fn missing_leading_fs() {
        assert!(matches!(
            parse_frame(b"316\x1fXX\x1dRIC\x1c"),
            Err(CodecError::MalformedHeader(_))
        ));
        assert!(matches!(parse_frame(b""), Err(CodecError::MalformedHeader(_))));
    }

    #[test]
    fn missing_trailing_fs_is_malformed_field() {
        let truncated = &UPDATE[..UPDATE.len() - 4];
        assert!(matches!(
            parse_frame(truncated),
            Err(CodecError::MalformedField { .. })
        ));
        assert!(matches!(
            parse_frame(b"\x1c"),
            Err(CodecError::MalformedField { .. })
        ));
    }

    #[test]
    fn bad_header_parts() {
        for bytes in [
            &b"\x1c316XX\x1dRIC\x1c"[..],
            b"\x1c3a6\x1fXX\x1dRIC\x1c",
            b"\x1c316\x1fXX RIC\x1c",
            b"\x1c316\x1fXX\x1d\x1c",
            b"\x1c316\x1fXX\x1dRIC\x1fx1\x1c",
            b"\x1c316\x1fXX\x1dR\x1fIC\x1f1\x1c",
        ] {
            assert!(
                matches!(parse_frame(bytes), Err(CodecError::MalformedHeader(_))),
                "{bytes:?}"
            );
        }
    }
}
