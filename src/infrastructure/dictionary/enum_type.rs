//! # Enumerated-Value Table Parser
//!
//! Parses the `enumtype.def` format: blocks of `ACRONYM FID` header lines
//! followed by `VALUE DISPLAY MEANING` lines that apply to every field in
//! the header.
//!
//! ```text
//! ! ACRONYM    FID
//! PRC_QL_CD    118
//! PRC_QL3     3264
//! ! VALUE      DISPLAY   MEANING
//!       0       "   "    normal market or not allocated
//!       1      #434C53#  closing
//! ```
//!
//! Display text is either double-quoted or a `#hex#` byte literal.

use crate::domain::entities::EnumValue;
use crate::domain::errors::{DictionaryError, DictionaryResult};
use crate::domain::value_objects::FieldId;

/// One block of the enum table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumBlock {
    /// Fields sharing this table, as `(acronym, fid)`.
    pub fields: Vec<(String, FieldId)>,
    /// Codes with their display text.
    pub values: Vec<(u16, EnumValue)>,
}

/// Parses enum table text into blocks.
///
/// # Errors
///
/// Returns [`DictionaryError::Parse`] naming the first malformed line.
pub fn parse_enum_tables(resource: &str, text: &str) -> DictionaryResult<Vec<EnumBlock>> {
    let mut blocks: Vec<EnumBlock> = Vec::new();
    let mut current = EnumBlock::default();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            continue;
        }
        let error = |reason: String| DictionaryError::parse(resource, line_no, reason);

        if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            if current.fields.is_empty() {
                return Err(error("value line before any field line".to_string()));
            }
            current.values.push(parse_value_line(trimmed).map_err(error)?);
        } else {
            if !current.values.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            current.fields.push(parse_field_line(trimmed).map_err(error)?);
        }
    }
    if !current.fields.is_empty() {
        blocks.push(current);
    }
    Ok(blocks)
}

fn parse_field_line(line: &str) -> Result<(String, FieldId), String> {
    let mut columns = line.split_whitespace();
    let acronym = columns.next().unwrap_or_default();
    let fid = columns
        .next()
        .ok_or_else(|| format!("missing FID for {acronym}"))?;
    let id: FieldId = fid.parse().map_err(|_| format!("invalid FID {fid:?}"))?;
    Ok((acronym.to_string(), id))
}

fn parse_value_line(line: &str) -> Result<(u16, EnumValue), String> {
    let (code, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| "missing display column".to_string())?;
    let code: u16 = code.parse().map_err(|_| format!("invalid value {code:?}"))?;
    let rest = rest.trim_start();

    let (display, meaning) = if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted
            .find('"')
            .ok_or_else(|| "unterminated display column".to_string())?;
        (
            quoted.get(..end).unwrap_or_default().to_string(),
            quoted.get(end + 1..).unwrap_or_default(),
        )
    } else if let Some(hex) = rest.strip_prefix('#') {
        let end = hex
            .find('#')
            .ok_or_else(|| "unterminated hex display column".to_string())?;
        (
            decode_hex(hex.get(..end).unwrap_or_default())?,
            hex.get(end + 1..).unwrap_or_default(),
        )
    } else {
        return Err("display column must be quoted or #hex#".to_string());
    };

    Ok((code, EnumValue::new(display, meaning.trim())))
}

fn decode_hex(hex: &str) -> Result<String, String> {
    if hex.len() % 2 != 0 {
        return Err(format!("odd-length hex display {hex:?}"));
    }
    let bytes = (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex display {hex:?}"))
        })
        .collect::<Result<Vec<u8>, String>>()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
! ACRONYM    FID
! -------    ---
PRC_QL_CD    118
PRC_QL3     3264
!
! VALUE      DISPLAY   MEANING
! -----      -------   -------
      0       "   "    normal market or not allocated
      1      #434C53#  closing
!
RDN_EXCHID     4
      0       "   "
      1      "NYS"     New York Stock Exchange
"#;

    #[test]
    fn parses_blocks() {
        let blocks = parse_enum_tables("enumtype.def", SAMPLE).unwrap();
        assert_eq!(blocks.len(), 2);

        let first = &blocks[0];
        assert_eq!(
            first.fields,
            vec![
                ("PRC_QL_CD".to_string(), FieldId::new(118)),
                ("PRC_QL3".to_string(), FieldId::new(3264)),
            ]
        );
        assert_eq!(first.values.len(), 2);
        assert_eq!(first.values[0].1.display(), "   ");
        assert_eq!(first.values[0].1.meaning(), "normal market or not allocated");
        assert_eq!(first.values[1].1.display(), "CLS");

        let second = &blocks[1];
        assert_eq!(second.fields[0].1, FieldId::new(4));
        assert_eq!(second.values[0].1.meaning(), "");
        assert_eq!(second.values[1].1.display(), "NYS");
    }

    #[test]
    fn value_before_field_is_error() {
        let err = parse_enum_tables("enumtype.def", "  0 \"A\" meaning\n").unwrap_err();
        assert!(matches!(err, DictionaryError::Parse { line: 1, .. }));
    }

    #[test]
    fn unquoted_display_is_error() {
        let err = parse_enum_tables("e", "FLD 1\n 0 A meaning\n").unwrap_err();
        assert!(matches!(err, DictionaryError::Parse { line: 2, .. }));
    }

    #[test]
    fn bad_hex_is_error() {
        assert!(parse_enum_tables("e", "FLD 1\n 0 #4G# x\n").is_err());
        assert!(parse_enum_tables("e", "FLD 1\n 0 #434# x\n").is_err());
    }
}
