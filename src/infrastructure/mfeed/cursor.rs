//! # Field Cursor
//!
//! Forward-only, stateful decoder over one [`MessageBuffer`].
//!
//! Fields are decoded one at a time as the cursor advances; nothing past
//! the current record is parsed. A malformed record aborts the `first` or
//! `next` call that met it, and the cursor refuses to continue until it is
//! restarted with `first`.
//!
//! # Examples
//!
//! ```
//! use mfeed::domain::entities::DictionaryBuilder;
//! use mfeed::domain::value_objects::FieldType;
//! use mfeed::infrastructure::mfeed::{CursorStatus, FieldCursor, MessageBuffer};
//!
//! let dictionary = DictionaryBuilder::new("demo")
//!     .field("BID", 22, FieldType::Price, 17)
//!     .field("ASK", 25, FieldType::Price, 17)
//!     .build()
//!     .unwrap();
//! let buffer = MessageBuffer::from(
//!     &b"\x1c316\x1fXX\x1dTIBX.O\x1e22\x1f+21.42\x1e25\x1f+21.43\x1c"[..],
//! );
//!
//! let mut cursor = FieldCursor::new(&dictionary);
//! let mut names = Vec::new();
//! let mut status = cursor.first(&buffer).unwrap();
//! while status == CursorStatus::Ok {
//!     names.push(cursor.name().unwrap().to_string());
//!     status = cursor.next().unwrap();
//! }
//! assert_eq!(names, ["BID", "ASK"]);
//! ```

use super::buffer::{MessageBuffer, parse_frame};
use super::error::{CodecError, CodecResult};
use super::separators::{self, RS, US};
use crate::domain::entities::{Dictionary, Field};
use crate::domain::value_objects::field_value::scan_fixed_point;
use crate::domain::value_objects::{
    FieldId, FieldType, FieldValue, MessageHeader, TypeHint, ValueError,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use std::ops::Range;

/// Outcome of a successful `first`/`next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorStatus {
    /// The cursor is positioned on a field.
    Ok,
    /// There are no more fields.
    EndOfMessage,
}

impl CursorStatus {
    /// Returns true when positioned on a field.
    #[inline]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// What to do with a numeric field id the dictionary does not define.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Treat the record as malformed.
    #[default]
    Reject,
    /// Yield a text field named by its id digits.
    CarryAsId,
}

#[derive(Debug, Clone)]
struct Current {
    field: Field,
    raw: Range<usize>,
}

#[derive(Debug, Clone)]
enum CursorState {
    Unpositioned,
    Positioned(Current),
    Exhausted,
    Failed,
}

/// Stateful forward cursor.
///
/// Reusable across messages through repeated [`FieldCursor::first`] calls.
/// One cursor serves one scan at a time; concurrent scans of the same
/// buffer each need their own cursor.
#[derive(Debug, Clone)]
pub struct FieldCursor<'d> {
    dictionary: &'d Dictionary,
    policy: UnknownFieldPolicy,
    bytes: Bytes,
    header: Option<MessageHeader>,
    next_record: usize,
    end: usize,
    state: CursorState,
}

impl<'d> FieldCursor<'d> {
    /// Creates a cursor that rejects unknown field ids.
    #[must_use]
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self {
            dictionary,
            policy: UnknownFieldPolicy::default(),
            bytes: Bytes::new(),
            header: None,
            next_record: 0,
            end: 0,
            state: CursorState::Unpositioned,
        }
    }

    /// Sets the policy for unknown field ids.
    #[must_use]
    pub fn with_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the unknown field id policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> UnknownFieldPolicy {
        self.policy
    }

    /// Validates the frame of `buffer` and positions on its first field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedHeader`] for a bad frame start or
    /// header, and [`CodecError::MalformedField`] for a truncated frame or a
    /// bad first record.
    pub fn first(&mut self, buffer: &MessageBuffer) -> CodecResult<CursorStatus> {
        self.state = CursorState::Failed;
        self.header = None;
        self.bytes = buffer.to_bytes();

        let frame = parse_frame(&self.bytes).inspect_err(|e| {
            tracing::trace!(error = %e, "rejected message frame");
        })?;
        self.header = Some(frame.header);
        self.next_record = frame.fields_start;
        self.end = frame.fields_end;
        self.advance()
    }

    /// Advances to the next field.
    ///
    /// Keeps returning [`CursorStatus::EndOfMessage`] once the end is reached.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] before `first` or after a
    /// failure, and [`CodecError::MalformedField`] for a bad record.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CodecResult<CursorStatus> {
        match self.state {
            CursorState::Unpositioned => {
                Err(CodecError::InvalidCursorState("next called before first"))
            }
            CursorState::Failed => Err(CodecError::InvalidCursorState(
                "cursor stopped on a malformed message",
            )),
            CursorState::Exhausted => Ok(CursorStatus::EndOfMessage),
            CursorState::Positioned(_) => self.advance(),
        }
    }

    /// Returns the header of the message being scanned.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] unless `first` succeeded.
    pub fn header(&self) -> CodecResult<&MessageHeader> {
        match self.state {
            CursorState::Positioned(_) | CursorState::Exhausted => self
                .header
                .as_ref()
                .ok_or(CodecError::InvalidCursorState("no message header")),
            _ => Err(CodecError::InvalidCursorState("no message header")),
        }
    }

    /// Returns the current field name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] when not positioned.
    pub fn name(&self) -> CodecResult<&str> {
        self.current().map(|c| c.field.name())
    }

    /// Returns the current field id; `None` for unmapped fields.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] when not positioned.
    pub fn id(&self) -> CodecResult<Option<FieldId>> {
        self.current().map(|c| c.field.id())
    }

    /// Returns the current type hint.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] when not positioned.
    pub fn type_hint(&self) -> CodecResult<TypeHint> {
        self.current().map(|c| c.field.hint())
    }

    /// Returns the current decoded value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] when not positioned.
    pub fn value(&self) -> CodecResult<&FieldValue> {
        self.current().map(|c| c.field.value())
    }

    /// Returns the current value as text, e.g. `21.42`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] when not positioned.
    pub fn string_value(&self) -> CodecResult<String> {
        self.current().map(|c| c.field.string_value())
    }

    /// Returns the current value exactly as it appears on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] when not positioned.
    pub fn raw_value(&self) -> CodecResult<&[u8]> {
        let current = self.current()?;
        Ok(self.bytes.get(current.raw.clone()).unwrap_or_default())
    }

    /// Returns an owned copy of the current field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidCursorState`] when not positioned.
    pub fn field(&self) -> CodecResult<Field> {
        self.current().map(|c| c.field.clone())
    }

    /// Scans `buffer` from its first field until one is named `name`.
    ///
    /// Always restarts from the beginning, so repeated calls each pay for a
    /// fresh scan. On success the cursor stays positioned on the match.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldNotFound`] after exhausting the message,
    /// or the first decoding error met on the way.
    pub fn seek(&mut self, buffer: &MessageBuffer, name: &str) -> CodecResult<Field> {
        let mut status = self.first(buffer)?;
        while status.is_ok() {
            if self.name()? == name {
                return self.field();
            }
            status = self.next()?;
        }
        Err(CodecError::FieldNotFound(name.to_string()))
    }

    fn current(&self) -> CodecResult<&Current> {
        match &self.state {
            CursorState::Positioned(current) => Ok(current),
            CursorState::Unpositioned => Err(CodecError::InvalidCursorState(
                "no current field: call first",
            )),
            CursorState::Exhausted => Err(CodecError::InvalidCursorState(
                "no current field: end of message",
            )),
            CursorState::Failed => Err(CodecError::InvalidCursorState(
                "no current field: message is malformed",
            )),
        }
    }

    fn advance(&mut self) -> CodecResult<CursorStatus> {
        if self.next_record >= self.end {
            self.state = CursorState::Exhausted;
            return Ok(CursorStatus::EndOfMessage);
        }
        let start = self.next_record;
        let record_end = self
            .bytes
            .get(start + 1..self.end)
            .and_then(|rest| rest.iter().position(|&b| b == RS))
            .map_or(self.end, |pos| start + 1 + pos);
        self.next_record = record_end;

        match decode_record(self.dictionary, self.policy, &self.bytes, start, record_end) {
            Ok(current) => {
                self.state = CursorState::Positioned(current);
                Ok(CursorStatus::Ok)
            }
            Err(e) => {
                tracing::trace!(offset = start, error = %e, "rejected field record");
                self.state = CursorState::Failed;
                Err(e)
            }
        }
    }
}

/// Decodes the record spanning `start` (its RS) to `end` (exclusive).
fn decode_record(
    dictionary: &Dictionary,
    policy: UnknownFieldPolicy,
    bytes: &[u8],
    start: usize,
    end: usize,
) -> CodecResult<Current> {
    let record = bytes.get(start + 1..end).unwrap_or_default();
    let us = record
        .iter()
        .position(|&b| b == US)
        .ok_or_else(|| CodecError::malformed(start, "missing US between key and value"))?;
    let key = record.get(..us).unwrap_or_default();
    let raw = record.get(us + 1..).unwrap_or_default();

    for (part, what) in [(key, "key"), (raw, "value")] {
        if let Some(pos) = separators::find_separator(part) {
            let byte = part.get(pos).copied().unwrap_or_default();
            return Err(CodecError::malformed(
                start,
                format!("unexpected {} in field {what}", separators::name(byte)),
            ));
        }
    }

    let (name, id, field_type) = resolve_key(dictionary, policy, key, start)?;
    let (hint, value) =
        decode_value(field_type, raw).map_err(|e| CodecError::malformed_value(start, &name, &e))?;

    let value_start = start + 1 + us + 1;
    Ok(Current {
        field: Field::decoded(name, id, hint, value),
        raw: value_start..end,
    })
}

fn resolve_key(
    dictionary: &Dictionary,
    policy: UnknownFieldPolicy,
    key: &[u8],
    offset: usize,
) -> CodecResult<(String, Option<FieldId>, Option<FieldType>)> {
    let Some(&lead) = key.first() else {
        return Err(CodecError::malformed(offset, "empty field key"));
    };

    if lead.is_ascii_digit() || lead == b'-' {
        let id = FieldId::from_wire(key).ok_or_else(|| {
            CodecError::malformed(
                offset,
                format!("invalid field id {:?}", String::from_utf8_lossy(key)),
            )
        })?;
        return match (dictionary.definition(id), policy) {
            (Some(def), _) => Ok((def.name().to_string(), Some(id), Some(def.field_type()))),
            (None, UnknownFieldPolicy::CarryAsId) => Ok((id.to_string(), Some(id), None)),
            (None, UnknownFieldPolicy::Reject) => Err(CodecError::malformed(
                offset,
                format!("field id {id} is not in dictionary {}", dictionary.name()),
            )),
        };
    }

    let name = std::str::from_utf8(key)
        .map_err(|_| CodecError::malformed(offset, "field name is not valid UTF-8"))?;
    Ok(match dictionary.definition_by_name(name) {
        Some(def) => (name.to_string(), Some(def.id()), Some(def.field_type())),
        None => (name.to_string(), None, None),
    })
}

/// Picks the hint for a record and decodes its value.
///
/// Numeric hints take their decimal count from the literal itself.
fn decode_value(
    field_type: Option<FieldType>,
    raw: &[u8],
) -> Result<(TypeHint, FieldValue), ValueError> {
    let hint = match field_type {
        Some(FieldType::Price | FieldType::Integer) => TypeHint::DENOM_NONE,
        Some(FieldType::Enumerated) => TypeHint::Enumerated,
        Some(FieldType::Alphanumeric) => TypeHint::FixedString(0),
        Some(FieldType::Time) => TypeHint::TimeMinutes,
        Some(FieldType::TimeSeconds) => TypeHint::TimeSeconds,
        Some(FieldType::Date) => TypeHint::Date,
        Some(FieldType::Binary) | None => TypeHint::Text,
    };
    if raw.is_empty() {
        return Ok((hint, FieldValue::Blank));
    }

    match (field_type, hint) {
        (Some(field_type), TypeHint::Decimal(_)) => {
            let text = std::str::from_utf8(raw).map_err(|_| ValueError::Encoding)?;
            let (value, places) =
                scan_fixed_point(text).ok_or_else(|| ValueError::NotNumeric(text.to_string()))?;
            if field_type == FieldType::Integer && places != 0 {
                return Err(ValueError::Precision {
                    value: text.to_string(),
                    places: 0,
                });
            }
            Ok((TypeHint::Decimal(places), FieldValue::Decimal(value)))
        }
        (_, TypeHint::FixedString(_)) => {
            let width = u16::try_from(raw.len()).map_err(|_| ValueError::TooWide {
                width: u16::MAX,
                len: raw.len(),
            })?;
            let hint = TypeHint::FixedString(width);
            Ok((hint, FieldValue::from_wire(raw, hint)?))
        }
        _ => Ok((hint, FieldValue::from_wire(raw, hint)?)),
    }
}

/// Looks up one field by name with a private cursor.
///
/// Every call scans from the first field: the cost is proportional to the
/// position of the field, and repeated calls repeat the scan.
///
/// # Errors
///
/// Returns [`CodecError::FieldNotFound`] if no field has that name, or the
/// first decoding error met before it.
pub fn get(dictionary: &Dictionary, buffer: &MessageBuffer, name: &str) -> CodecResult<Field> {
    FieldCursor::new(dictionary).seek(buffer, name)
}

/// Iterator over the fields of one message.
///
/// Yields `Err` at most once, then ends.
#[derive(Debug, Clone)]
pub struct Fields<'d> {
    cursor: FieldCursor<'d>,
    pending: Option<MessageBuffer>,
    done: bool,
}

impl<'d> Fields<'d> {
    /// Wraps `cursor` to iterate over `buffer` from its first field.
    #[must_use]
    pub fn new(cursor: FieldCursor<'d>, buffer: MessageBuffer) -> Self {
        Self {
            cursor,
            pending: Some(buffer),
            done: false,
        }
    }
}

impl Iterator for Fields<'_> {
    type Item = CodecResult<Field>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let status = match self.pending.take() {
            Some(buffer) => self.cursor.first(&buffer),
            None => self.cursor.next(),
        };
        match status.and_then(|status| match status {
            CursorStatus::Ok => self.cursor.field().map(Some),
            CursorStatus::EndOfMessage => Ok(None),
        }) {
            Ok(Some(field)) => Some(Ok(field)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Fields<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::DictionaryBuilder;
    use rust_decimal::Decimal;

    fn dictionary() -> Dictionary {
        DictionaryBuilder::new("test")
            .field("BID", 22, FieldType::Price, 17)
            .field("ASK", 25, FieldType::Price, 17)
            .field("BIDSIZE", 30, FieldType::Integer, 15)
            .field("PRC_QL_CD", 118, FieldType::Enumerated, 3)
            .field("BID_MMID1", 293, FieldType::Alphanumeric, 4)
            .field("QUOTIM", 1025, FieldType::TimeSeconds, 8)
            .build()
            .unwrap()
    }

    fn message(records: &[&[u8]]) -> MessageBuffer {
        let mut bytes = b"\x1c316\x1fXX\x1dTIBX.O\x1f7".to_vec();
        for record in records {
            bytes.push(RS);
            bytes.extend_from_slice(record);
        }
        bytes.push(separators::FS);
        MessageBuffer::from(bytes)
    }

    #[test]
    fn visits_fields_in_order() {
        let dictionary = dictionary();
        let buffer = message(&[b"22\x1f+21.42", b"30\x1f+7", b"293\x1fNAS "]);
        let mut cursor = FieldCursor::new(&dictionary);

        assert_eq!(cursor.first(&buffer).unwrap(), CursorStatus::Ok);
        assert_eq!(cursor.name().unwrap(), "BID");
        assert_eq!(cursor.id().unwrap(), Some(FieldId::new(22)));
        assert_eq!(cursor.type_hint().unwrap(), TypeHint::Decimal(2));
        assert_eq!(cursor.string_value().unwrap(), "21.42");
        assert_eq!(cursor.raw_value().unwrap(), b"+21.42");

        assert_eq!(cursor.next().unwrap(), CursorStatus::Ok);
        assert_eq!(cursor.name().unwrap(), "BIDSIZE");
        assert_eq!(cursor.value().unwrap(), &FieldValue::Decimal(Decimal::new(7, 0)));

        assert_eq!(cursor.next().unwrap(), CursorStatus::Ok);
        assert_eq!(cursor.type_hint().unwrap(), TypeHint::FixedString(4));
        assert_eq!(cursor.string_value().unwrap(), "NAS ");

        assert_eq!(cursor.next().unwrap(), CursorStatus::EndOfMessage);
        assert_eq!(cursor.next().unwrap(), CursorStatus::EndOfMessage);
        assert_eq!(cursor.header().unwrap().ric(), "TIBX.O");
    }

    #[test]
    fn empty_message_is_end_of_message() {
        let dictionary = dictionary();
        let mut cursor = FieldCursor::new(&dictionary);
        assert_eq!(cursor.first(&message(&[])).unwrap(), CursorStatus::EndOfMessage);
        assert!(matches!(cursor.name(), Err(CodecError::InvalidCursorState(_))));
    }

    #[test]
    fn accessors_before_first_fail() {
        let dictionary = dictionary();
        let mut cursor = FieldCursor::new(&dictionary);
        assert!(matches!(cursor.name(), Err(CodecError::InvalidCursorState(_))));
        assert!(matches!(cursor.raw_value(), Err(CodecError::InvalidCursorState(_))));
        assert!(matches!(cursor.header(), Err(CodecError::InvalidCursorState(_))));
        assert!(matches!(cursor.next(), Err(CodecError::InvalidCursorState(_))));
    }

    #[test]
    fn accessors_after_end_fail() {
        let dictionary = dictionary();
        let mut cursor = FieldCursor::new(&dictionary);
        cursor.first(&message(&[b"22\x1f+1"])).unwrap();
        assert_eq!(cursor.next().unwrap(), CursorStatus::EndOfMessage);
        assert!(matches!(cursor.field(), Err(CodecError::InvalidCursorState(_))));
    }

    #[test]
    fn malformed_record_stops_cursor() {
        let dictionary = dictionary();
        let buffer = message(&[b"22\x1f+21.42", b"25+21.43", b"30\x1f+7"]);
        let mut cursor = FieldCursor::new(&dictionary);
        assert_eq!(cursor.first(&buffer).unwrap(), CursorStatus::Ok);
        assert!(matches!(cursor.next(), Err(CodecError::MalformedField { .. })));
        assert!(matches!(cursor.next(), Err(CodecError::InvalidCursorState(_))));
        assert!(matches!(cursor.name(), Err(CodecError::InvalidCursorState(_))));
    }

    #[test]
    fn cursor_restarts_with_first() {
        let dictionary = dictionary();
        let bad = message(&[b"2x\x1f1"]);
        let good = message(&[b"25\x1f+21.43"]);
        let mut cursor = FieldCursor::new(&dictionary);
        assert!(cursor.first(&bad).is_err());
        assert_eq!(cursor.first(&good).unwrap(), CursorStatus::Ok);
        assert_eq!(cursor.name().unwrap(), "ASK");
    }

    #[test]
    fn malformed_values() {
        let dictionary = dictionary();
        let mut cursor = FieldCursor::new(&dictionary);
        for record in [
            &b"22\x1fabc"[..],
            b"30\x1f+7.5",
            b"118\x1fX",
            b"1025\x1f25:00:00",
            b"1025\x1f23:59:60",
            b"\x1f1",
            b"22\x1f1\x1f2",
            b"22\x1f1\x1d",
        ] {
            assert!(
                matches!(cursor.first(&message(&[record])), Err(CodecError::MalformedField { .. })),
                "{record:?}"
            );
        }
    }

    #[test]
    fn unknown_id_policy() {
        let dictionary = dictionary();
        let buffer = message(&[b"9999\x1fhello"]);

        let mut strict = FieldCursor::new(&dictionary);
        assert!(matches!(strict.first(&buffer), Err(CodecError::MalformedField { .. })));

        let mut lenient = FieldCursor::new(&dictionary).with_policy(UnknownFieldPolicy::CarryAsId);
        assert_eq!(lenient.first(&buffer).unwrap(), CursorStatus::Ok);
        assert_eq!(lenient.name().unwrap(), "9999");
        assert_eq!(lenient.type_hint().unwrap(), TypeHint::Text);
        assert_eq!(lenient.string_value().unwrap(), "hello");
    }

    #[test]
    fn name_keyed_fields() {
        let dictionary = dictionary();
        let buffer = message(&[b"MY_FIELD\x1fhello", b"ASK\x1f+1.5"]);
        let fields: Vec<Field> = buffer.fields(&dictionary).map(Result::unwrap).collect();

        assert_eq!(fields[0].name(), "MY_FIELD");
        assert_eq!(fields[0].id(), None);
        assert_eq!(fields[0].hint(), TypeHint::Text);

        assert_eq!(fields[1].id(), Some(FieldId::new(25)));
        assert_eq!(fields[1].hint(), TypeHint::Decimal(1));
    }

    #[test]
    fn blank_values() {
        let dictionary = dictionary();
        let buffer = message(&[b"22\x1f", b"293\x1f"]);
        let fields: Vec<Field> = buffer.fields(&dictionary).map(Result::unwrap).collect();
        assert!(fields.iter().all(|f| f.value().is_blank()));
    }

    #[test]
    fn get_rescans_and_reports_missing() {
        let dictionary = dictionary();
        let buffer = message(&[b"22\x1f+21.42", b"25\x1f+21.43"]);
        assert_eq!(get(&dictionary, &buffer, "ASK").unwrap().string_value(), "21.43");
        assert_eq!(get(&dictionary, &buffer, "BID").unwrap().string_value(), "21.42");
        assert_eq!(
            get(&dictionary, &buffer, "LAST"),
            Err(CodecError::FieldNotFound("LAST".to_string()))
        );
    }

    #[test]
    fn fields_iterator_stops_after_error() {
        let dictionary = dictionary();
        let buffer = message(&[b"22\x1f+1", b"bad", b"25\x1f+2"]);
        let mut fields = buffer.fields(&dictionary);
        assert!(fields.next().unwrap().is_ok());
        assert!(fields.next().unwrap().is_err());
        assert!(fields.next().is_none());
        assert!(fields.next().is_none());
    }
}
