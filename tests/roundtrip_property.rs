//! Property tests: whatever the builder accepts, the cursor reads back.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::NaiveTime;
use mfeed::domain::entities::{Dictionary, DictionaryBuilder, Field};
use mfeed::domain::value_objects::{FieldType, FieldValue, MessageHeader, RecordType, TypeHint};
use mfeed::infrastructure::mfeed::{CodecError, MessageBuffer, MessageBuilder};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn dictionary() -> Dictionary {
    DictionaryBuilder::new("props")
        .field("BID", 22, FieldType::Price, 17)
        .field("BIDSIZE", 30, FieldType::Integer, 15)
        .field("PRC_QL_CD", 118, FieldType::Enumerated, 3)
        .field("BID_MMID1", 293, FieldType::Alphanumeric, 8)
        .field("QUOTIM", 1025, FieldType::TimeSeconds, 8)
        .field("LOCAL", -12, FieldType::Price, 17)
        .build()
        .unwrap()
}

fn price() -> impl Strategy<Value = Field> {
    (any::<i64>(), 0_u8..=9).prop_map(|(mantissa, places)| {
        let mantissa = mantissa % 1_000_000_000_000;
        Field::new("BID", Decimal::new(mantissa, u32::from(places)), TypeHint::Decimal(places))
    })
}

fn local_price() -> impl Strategy<Value = Field> {
    (-1_000_000_i64..1_000_000, 0_u8..=4).prop_map(|(mantissa, places)| {
        Field::new("LOCAL", Decimal::new(mantissa, u32::from(places)), TypeHint::Decimal(places))
    })
}

fn size() -> impl Strategy<Value = Field> {
    (0_i64..10_000_000_000).prop_map(|n| Field::new("BIDSIZE", n, TypeHint::DENOM_NONE))
}

fn code() -> impl Strategy<Value = Field> {
    (0_u32..1000).prop_map(|n| Field::new("PRC_QL_CD", n.to_string(), TypeHint::Enumerated))
}

fn mmid() -> impl Strategy<Value = Field> {
    "[A-Z ]{0,8}".prop_map(|text| Field::new("BID_MMID1", text, TypeHint::FixedString(8)))
}

fn quote_time() -> impl Strategy<Value = Field> {
    (0_u32..24, 0_u32..60, 0_u32..60).prop_map(|(h, m, s)| {
        Field::new("QUOTIM", NaiveTime::from_hms_opt(h, m, s).unwrap(), TypeHint::TimeSeconds)
    })
}

fn unmapped() -> impl Strategy<Value = Field> {
    ("[A-Z][A-Z_]{0,11}", "[ -~]{0,24}").prop_filter_map("name must be unmapped", |(name, text)| {
        let reserved = ["BID", "BIDSIZE", "PRC_QL_CD", "BID_MMID1", "QUOTIM", "LOCAL"];
        (!reserved.contains(&name.as_str())).then(|| Field::new(name, text, TypeHint::Text))
    })
}

fn blank() -> impl Strategy<Value = Field> {
    Just(Field::new("BID", FieldValue::Blank, TypeHint::DENOM_NONE))
}

fn any_field() -> impl Strategy<Value = Field> {
    prop_oneof![
        price(),
        local_price(),
        size(),
        code(),
        mmid(),
        quote_time(),
        unmapped(),
        blank(),
    ]
}

fn header() -> impl Strategy<Value = MessageHeader> {
    (
        prop_oneof![
            Just(RecordType::Image),
            Just(RecordType::Update),
            Just(RecordType::Correction),
            Just(RecordType::ClosingRun),
        ],
        "[A-Z0-9]{2}",
        "[A-Z][A-Z0-9.=]{0,15}",
    )
        .prop_map(|(record_type, tag, ric)| MessageHeader::new(record_type, tag, ric))
}

fn encode(dictionary: &Dictionary, header: &MessageHeader, fields: &[Field]) -> MessageBuffer {
    let mut builder = MessageBuilder::new(dictionary, header).unwrap();
    for field in fields {
        builder.append_field(field).unwrap();
    }
    builder.finish()
}

proptest! {
    #[test]
    fn decode_of_encode_is_identity(header in header(), fields in prop::collection::vec(any_field(), 0..24)) {
        let dictionary = dictionary();
        let buffer = encode(&dictionary, &header, &fields);

        let decoded: Vec<Field> = buffer.fields(&dictionary).collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(&decoded, &fields);
        prop_assert_eq!(buffer.header().unwrap(), header);
    }

    #[test]
    fn reencoding_decoded_fields_is_byte_identical(header in header(), fields in prop::collection::vec(any_field(), 0..24)) {
        let dictionary = dictionary();
        let buffer = encode(&dictionary, &header, &fields);

        let decoded: Vec<Field> = buffer.fields(&dictionary).collect::<Result<_, _>>().unwrap();
        let again = encode(&dictionary, &buffer.header().unwrap(), &decoded);
        prop_assert_eq!(again.as_bytes(), buffer.as_bytes());
    }

    #[test]
    fn get_matches_first_scanned_field(fields in prop::collection::vec(any_field(), 1..16), pick in any::<prop::sample::Index>()) {
        let dictionary = dictionary();
        let header = MessageHeader::new(RecordType::Update, "XX", "TIBX.O");
        let buffer = encode(&dictionary, &header, &fields);

        let name = fields[pick.index(fields.len())].name();
        let first = buffer
            .fields(&dictionary)
            .map(Result::unwrap)
            .find(|field| field.name() == name)
            .unwrap();
        prop_assert_eq!(buffer.get(&dictionary, name).unwrap(), first);
    }

    #[test]
    fn truncation_is_always_detected(fields in prop::collection::vec(any_field(), 1..8), cut in any::<prop::sample::Index>()) {
        let dictionary = dictionary();
        let header = MessageHeader::new(RecordType::Update, "XX", "TIBX.O");
        let bytes = encode(&dictionary, &header, &fields).as_bytes().to_vec();

        let len = 1 + cut.index(bytes.len() - 1);
        let truncated = MessageBuffer::from(bytes[..len].to_vec());
        let result: Result<Vec<Field>, CodecError> = truncated.fields(&dictionary).collect();
        prop_assert!(
            matches!(result, Err(CodecError::MalformedField { .. })),
            "expected MalformedField, got {:?}",
            result
        );
    }
}
