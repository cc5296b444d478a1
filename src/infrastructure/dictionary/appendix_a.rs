//! # Appendix A Parser
//!
//! Parses the field dictionary text format, one field per line:
//!
//! ```text
//! ! ACRONYM    DDE ACRONYM        FID  RIPPLES TO  FIELD TYPE    LENGTH   RWF TYPE  RWF LEN
//! BID          "BID"               22  BID_1       PRICE         17       REAL64    7
//! PRC_QL_CD    "PRICE QUAL CODE"  118  NULL        ENUMERATED    3 ( 2 )  ENUM      1
//! ```
//!
//! Lines starting with `!` are comments. Columns past `LENGTH` are ignored.

use crate::domain::entities::FieldDefinition;
use crate::domain::errors::{DictionaryError, DictionaryResult};
use crate::domain::value_objects::{FieldId, FieldType};

const MIN_COLUMNS: usize = 6;

/// Parses field definitions from appendix A text.
///
/// # Errors
///
/// Returns [`DictionaryError::Parse`] naming the first malformed line.
pub fn parse_field_definitions(resource: &str, text: &str) -> DictionaryResult<Vec<FieldDefinition>> {
    let mut definitions = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            continue;
        }
        let definition = parse_line(trimmed)
            .map_err(|reason| DictionaryError::parse(resource, line_no, reason))?;
        definitions.push(definition);
    }
    Ok(definitions)
}

fn parse_line(line: &str) -> Result<FieldDefinition, String> {
    let columns = tokenize(line)?;
    if columns.len() < MIN_COLUMNS {
        return Err(format!(
            "expected at least {MIN_COLUMNS} columns, found {}",
            columns.len()
        ));
    }
    let column = |i: usize| columns.get(i).copied().unwrap_or_default();

    let name = column(0);
    let display_name = column(1);
    let id: FieldId = column(2)
        .parse()
        .map_err(|_| format!("invalid FID {:?}", column(2)))?;
    let ripples_to = column(3);
    let field_type: FieldType = column(4).parse().map_err(|e| format!("{e}"))?;
    let width: u16 = column(5)
        .parse()
        .map_err(|_| format!("invalid length {:?}", column(5)))?;

    let mut definition =
        FieldDefinition::new(name, id, field_type, width).with_display_name(display_name);
    if ripples_to != "NULL" {
        definition = definition.with_ripples_to(ripples_to);
    }
    Ok(definition)
}

/// Splits on whitespace, keeping double-quoted columns together.
fn tokenize(line: &str) -> Result<Vec<&str>, String> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted
                .find('"')
                .ok_or_else(|| "unterminated quoted column".to_string())?;
            tokens.push(quoted.get(..end).unwrap_or_default());
            rest = quoted.get(end + 1..).unwrap_or_default().trim_start();
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tokens.push(rest.get(..end).unwrap_or_default());
            rest = rest.get(end..).unwrap_or_default().trim_start();
        }
    }
    Ok(tokens)
}
