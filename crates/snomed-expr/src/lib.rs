//! Parser and model for SNOMED CT bulk-authoring concept expressions.
//!
//! Bulk authoring sheets describe each new concept with a compact expression:
//! a definition status marker, one or more parents, and grouped attribute
//! refinements, optionally annotated with pipe-delimited captions.
//!
//! # Quick Start
//!
//! ```rust
//! use snomed_expr::parse_expression;
//!
//! let expr = parse_expression(
//!     "<<< 71388002 |Procedure| : { 260686004 |Method| = 129264002 |Action| }",
//! )
//! .unwrap();
//!
//! assert!(!expr.is_fully_defined());
//! assert_eq!(expr.focus_concepts()[0].as_str(), "71388002");
//! assert_eq!(expr.attribute_groups()[0].attributes()[0].temp_id.to_string(), "rel_1.0");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Expression, attribute group, relationship and concept types
//! - [`parser`]: Normalization and staged extraction
//! - [`validate`]: Opt-in SCTID checks
//! - [`hierarchy`]: Parent-first load ordering for a batch
//! - [`error`]: Error types
//!
//! # Expression format
//!
//! - `===` marks a fully defined concept, `<<<` a primitive one
//! - focus concepts are separated by `+`
//! - a `:` introduces the refinement, which must consist of `{...}` groups
//! - attributes inside a group are `type=value` pairs separated by `,`
//!
//! Captions end at the first of `| : + { , }` after the opening pipe, so a
//! caption containing one of those characters is cut short.

pub mod error;
pub mod hierarchy;
pub mod model;
pub mod parser;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{AllocationError, ErrorCode, ParseError, SctidError, ValidationError};
pub use hierarchy::{LoadOrder, load_order};
pub use model::{
    Acceptability, AttributeGroup, CharacteristicType, Concept, ConceptId, DefinitionStatus,
    Description, DescriptionType, Expression, ExpressionBuilder, Modifier, ParsedAttribute,
    Relationship, RelationshipBuilder, RelationshipId, SctidAllocator, StatedRelationshipBuilder,
    TempId,
};
pub use parser::{normalize, parse_expression, parse_expression_with};
pub use validate::{Partition, PartitionKind, validate_expression, validate_sctid};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
