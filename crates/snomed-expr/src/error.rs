//! Error types for expression parsing, identifier handling and load ordering.

use thiserror::Error;

/// Stable error codes for parse failures.
///
/// The import report carries these codes so failed rows can be grouped
/// without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// P001: Definition status marker missing or unknown
    UnknownDefinitionStatus,
    /// P002: No focus concept before the refinement
    MissingFocusConcept,
    /// P003: Refinement not wrapped in an attribute group
    MalformedGroupStructure,
    /// P004: Attribute is not a `type=value` pair
    MalformedAttribute,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "P001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnknownDefinitionStatus => "P001",
            ErrorCode::MissingFocusConcept => "P002",
            ErrorCode::MalformedGroupStructure => "P003",
            ErrorCode::MalformedAttribute => "P004",
        }
    }
}

/// Error while parsing an authoring expression.
///
/// Every variant is a permanent failure of one expression: parsing is a pure
/// function of the input text, so retrying cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("[P001] unknown definition status: expected '===' or '<<<', found {found:?}")]
    UnknownDefinitionStatus { found: String },

    #[error("[P002] expression has no focus concept")]
    MissingFocusConcept,

    #[error("[P003] refinement must start with '{{', found {found:?}")]
    MalformedGroupStructure { found: String },

    #[error("[P004] malformed attribute {attribute_text:?} in group {group_number}: expected type=value")]
    MalformedAttribute {
        group_number: u32,
        attribute_text: String,
    },
}

impl ParseError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::UnknownDefinitionStatus { .. } => ErrorCode::UnknownDefinitionStatus,
            ParseError::MissingFocusConcept => ErrorCode::MissingFocusConcept,
            ParseError::MalformedGroupStructure { .. } => ErrorCode::MalformedGroupStructure,
            ParseError::MalformedAttribute { .. } => ErrorCode::MalformedAttribute,
        }
    }
}

/// Error while checking the structure of an SCTID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SctidError {
    #[error("identifier is empty")]
    Empty,

    #[error("non-digit character at position {position}")]
    NonDigit { position: usize },

    #[error("identifier length {len} outside 6..=18")]
    BadLength { len: usize },

    #[error("identifier has a leading zero")]
    LeadingZero,

    #[error("unknown partition identifier {partition:?}")]
    BadPartition { partition: String },

    #[error("check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },
}

/// Error during advisory validation of a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("focus concept {id:?} is not a valid SCTID: {source}")]
    InvalidFocusConcept { id: String, source: SctidError },

    #[error("attribute type {id:?} in group {group_number} is not a valid SCTID: {source}")]
    InvalidAttributeType {
        id: String,
        group_number: u32,
        source: SctidError,
    },

    #[error("attribute value {id:?} in group {group_number} is not a valid SCTID: {source}")]
    InvalidAttributeValue {
        id: String,
        group_number: u32,
        source: SctidError,
    },

    #[error("{id:?} is a {actual:?} identifier, expected a concept identifier")]
    NotAConcept {
        id: String,
        actual: crate::validate::PartitionKind,
    },
}

/// Error while allocating new identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("namespace {namespace} has more than 7 digits")]
    InvalidNamespace { namespace: u32 },

    #[error("item identifiers exhausted for namespace {namespace:?}")]
    NamespaceExhausted { namespace: Option<u32> },
}
