//! Structural validation of SNOMED CT identifiers.
//!
//! The parser treats concept identifiers as opaque tokens. This module
//! provides the opt-in checks an importer can run afterwards:
//! digit-only text of length 6 to 18, no leading zero, a known partition
//! identifier and a valid Verhoeff check digit.
//!
//! **Note:** Validation is advisory. Nothing in [`crate::parser`] calls it.

use crate::error::{SctidError, ValidationError};
use crate::model::Expression;

/// Component type encoded in the partition identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PartitionKind {
    Concept,
    Description,
    Relationship,
}

impl PartitionKind {
    /// Returns the second partition digit for this component type.
    pub fn digit(&self) -> char {
        match self {
            PartitionKind::Concept => '0',
            PartitionKind::Description => '1',
            PartitionKind::Relationship => '2',
        }
    }
}

/// Decoded partition identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub kind: PartitionKind,
    /// True for the namespaced (`1x`) forms.
    pub extension: bool,
}

impl Partition {
    fn from_digits(digits: &str) -> Option<Self> {
        let (extension, kind) = match digits {
            "00" => (false, PartitionKind::Concept),
            "01" => (false, PartitionKind::Description),
            "02" => (false, PartitionKind::Relationship),
            "10" => (true, PartitionKind::Concept),
            "11" => (true, PartitionKind::Description),
            "12" => (true, PartitionKind::Relationship),
            _ => return None,
        };
        Some(Self { kind, extension })
    }
}

// =============================================================================
// VERHOEFF
// =============================================================================

const MULTIPLICATION: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

const PERMUTATION: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

const INVERSE: [u8; 10] = [0, 4, 3, 2, 1, 5, 6, 7, 8, 9];

/// Runs the Verhoeff checksum over `digits`, treating the last digit as
/// position `offset`.
fn verhoeff(digits: &str, offset: usize) -> u8 {
    digits
        .bytes()
        .rev()
        .enumerate()
        .fold(0u8, |check, (i, b)| {
            let digit = (b - b'0') as usize;
            MULTIPLICATION[check as usize][PERMUTATION[(i + offset) % 8][digit] as usize]
        })
}

/// Computes the Verhoeff check digit to append to `digits`.
///
/// `digits` must contain only ASCII digits.
pub fn verhoeff_check_digit(digits: &str) -> u8 {
    INVERSE[verhoeff(digits, 1) as usize]
}

/// Validates the structure of an SCTID and returns its partition.
pub fn validate_sctid(id: &str) -> Result<Partition, SctidError> {
    if id.is_empty() {
        return Err(SctidError::Empty);
    }
    if let Some(position) = id.bytes().position(|b| !b.is_ascii_digit()) {
        return Err(SctidError::NonDigit { position });
    }
    if !(6..=18).contains(&id.len()) {
        return Err(SctidError::BadLength { len: id.len() });
    }
    if id.starts_with('0') {
        return Err(SctidError::LeadingZero);
    }

    let len = id.len();
    let partition_digits = &id[len - 3..len - 1];
    let partition = Partition::from_digits(partition_digits).ok_or_else(|| {
        SctidError::BadPartition {
            partition: partition_digits.to_string(),
        }
    })?;

    let found = id.as_bytes()[len - 1] - b'0';
    let expected = verhoeff_check_digit(&id[..len - 1]);
    if found != expected {
        return Err(SctidError::CheckDigitMismatch { expected, found });
    }

    Ok(partition)
}

/// Validates every identifier in a parsed expression.
///
/// Focus concepts, attribute types and attribute values must all be valid
/// concept SCTIDs.
pub fn validate_expression(expression: &Expression) -> Result<(), ValidationError> {
    for focus in expression.focus_concepts() {
        let partition = validate_sctid(focus.as_str()).map_err(|source| {
            ValidationError::InvalidFocusConcept {
                id: focus.to_string(),
                source,
            }
        })?;
        require_concept(focus.as_str(), partition)?;
    }

    for group in expression.attribute_groups() {
        for attribute in group.attributes() {
            let type_partition = validate_sctid(attribute.type_id.as_str()).map_err(|source| {
                ValidationError::InvalidAttributeType {
                    id: attribute.type_id.to_string(),
                    group_number: group.group_number(),
                    source,
                }
            })?;
            require_concept(attribute.type_id.as_str(), type_partition)?;

            let value_partition =
                validate_sctid(attribute.value_id.as_str()).map_err(|source| {
                    ValidationError::InvalidAttributeValue {
                        id: attribute.value_id.to_string(),
                        group_number: group.group_number(),
                        source,
                    }
                })?;
            require_concept(attribute.value_id.as_str(), value_partition)?;
        }
    }

    Ok(())
}

fn require_concept(id: &str, partition: Partition) -> Result<(), ValidationError> {
    if partition.kind == PartitionKind::Concept {
        Ok(())
    } else {
        Err(ValidationError::NotAConcept {
            id: id.to_string(),
            actual: partition.kind,
        })
    }
}
