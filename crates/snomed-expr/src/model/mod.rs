//! Data model types for authoring expressions.
//!
//! This module contains all the core types produced by the parser:
//! - Identifiers (concept ids, temporary relationship ids, SCTID allocation)
//! - Expressions (definition status, focus concepts, attribute groups)
//! - Relationships (materialized attributes)
//! - Concepts (per-row records for the batch loader)
//! - Builders (construction without text)

pub mod builder;
pub mod concept;
pub mod expression;
pub mod id;
pub mod relationship;
pub mod well_known;

pub use builder::{ExpressionBuilder, GroupBuilder};
pub use concept::{Acceptability, Concept, Description, DescriptionType};
pub use expression::{AttributeGroup, DefinitionStatus, Expression, ParsedAttribute};
pub use id::{ConceptId, SctidAllocator, TempId};
pub use relationship::{
    CharacteristicType, Modifier, Relationship, RelationshipBuilder, RelationshipId,
    StatedRelationshipBuilder,
};
