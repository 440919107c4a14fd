//! Extraction stages applied to normalized expression text.
//!
//! Each stage consumes a prefix of the buffer and hands the rest to the next
//! stage: definition status, then focus concepts, then attribute groups.

use crate::error::ParseError;
use crate::model::{AttributeGroup, ConceptId, ParsedAttribute, RelationshipBuilder, TempId};
use crate::parser::scanner::Scanner;

/// Marker for a fully defined concept.
pub const FULLY_DEFINED_MARKER: &str = "===";
/// Marker for a primitive concept.
pub const PRIMITIVE_MARKER: &str = "<<<";

const REFINEMENT_SEPARATOR: u8 = b':';
const FOCUS_SEPARATOR: char = '+';
const GROUP_OPEN: char = '{';
const GROUP_CLOSE: char = '}';
const ATTRIBUTE_SEPARATOR: char = ',';
const TYPE_VALUE_SEPARATOR: char = '=';

/// Consumes the definition status marker.
///
/// Returns `true` for fully defined, `false` for primitive, together with the
/// text after the marker.
pub fn extract_definition_status(buf: &str) -> Result<(bool, &str), ParseError> {
    let mut scanner = Scanner::new(buf);
    if scanner.eat(FULLY_DEFINED_MARKER) {
        Ok((true, scanner.remaining()))
    } else if scanner.eat(PRIMITIVE_MARKER) {
        Ok((false, scanner.remaining()))
    } else {
        Err(ParseError::UnknownDefinitionStatus {
            found: buf.chars().take(FULLY_DEFINED_MARKER.len()).collect(),
        })
    }
}

/// Consumes the focus concepts up to the first `:`.
///
/// Without a `:` the whole buffer is the focus segment and nothing remains.
/// Empty tokens between `+` separators are dropped.
pub fn extract_focus_concepts(buf: &str) -> (Vec<&str>, &str) {
    let mut scanner = Scanner::new(buf);
    let segment = match scanner.take_until(REFINEMENT_SEPARATOR) {
        Some(segment) => segment,
        None => scanner.take_rest(),
    };
    let focus = segment
        .split(FOCUS_SEPARATOR)
        .filter(|token| !token.is_empty())
        .collect();
    (focus, scanner.remaining())
}

/// Splits the refinement into raw group bodies, in source order.
///
/// An empty refinement has no groups. A non-empty one must open with `{`;
/// every `}` is discarded and the rest is split on `{`.
pub fn extract_groups(buf: &str) -> Result<Vec<String>, ParseError> {
    if buf.is_empty() {
        return Ok(Vec::new());
    }
    let mut scanner = Scanner::new(buf);
    if !scanner.eat_byte(GROUP_OPEN as u8) {
        return Err(ParseError::MalformedGroupStructure {
            found: buf.to_string(),
        });
    }
    let body: String = scanner
        .remaining()
        .chars()
        .filter(|&c| c != GROUP_CLOSE)
        .collect();
    Ok(body.split(GROUP_OPEN).map(str::to_string).collect())
}

/// Parses one group body into attributes.
///
/// Each `,`-separated attribute must be exactly `type=value` with both sides
/// non-empty. The first malformed attribute fails the whole group.
pub fn parse_group(
    group_number: u32,
    raw_body: &str,
    builder: &impl RelationshipBuilder,
) -> Result<AttributeGroup, ParseError> {
    let attributes = raw_body
        .split(ATTRIBUTE_SEPARATOR)
        .enumerate()
        .map(|(index, text)| parse_attribute(group_number, index, text, builder))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AttributeGroup::new(group_number, attributes))
}

fn parse_attribute(
    group_number: u32,
    index: usize,
    text: &str,
    builder: &impl RelationshipBuilder,
) -> Result<ParsedAttribute, ParseError> {
    let malformed = || ParseError::MalformedAttribute {
        group_number,
        attribute_text: text.to_string(),
    };

    let mut parts = text.split(TYPE_VALUE_SEPARATOR);
    let (Some(type_part), Some(value_part), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };
    let type_id = ConceptId::new(type_part).ok_or_else(malformed)?;
    let value_id = ConceptId::new(value_part).ok_or_else(malformed)?;

    let temp_id = TempId::new(group_number, index);
    let relationship = builder.build(
        group_number,
        temp_id,
        None,
        type_id.clone(),
        value_id.clone(),
    );
    Ok(ParsedAttribute {
        temp_id,
        type_id,
        value_id,
        relationship,
    })
}
