//! Relationship records produced for each parsed attribute.
//!
//! The parser does not decide how a relationship is materialized. It hands
//! each `(group, type, value)` triple to a [`RelationshipBuilder`], and the
//! default [`StatedRelationshipBuilder`] fills in the usual authoring values.

use crate::model::well_known;
use crate::model::{ConceptId, TempId};

/// How a relationship was asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CharacteristicType {
    #[default]
    Stated,
    Inferred,
    Additional,
}

impl CharacteristicType {
    /// Returns the metadata concept for this characteristic type.
    pub fn concept_id(&self) -> &'static ConceptId {
        match self {
            CharacteristicType::Stated => &well_known::STATED_RELATIONSHIP,
            CharacteristicType::Inferred => &well_known::INFERRED_RELATIONSHIP,
            CharacteristicType::Additional => &well_known::ADDITIONAL_RELATIONSHIP,
        }
    }
}

/// Description logic restriction applied to a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Modifier {
    #[default]
    Existential,
    Universal,
}

impl Modifier {
    /// Returns the metadata concept for this modifier.
    pub fn concept_id(&self) -> &'static ConceptId {
        match self {
            Modifier::Existential => &well_known::EXISTENTIAL_MODIFIER,
            Modifier::Universal => &well_known::UNIVERSAL_MODIFIER,
        }
    }
}

/// Identifier of a relationship.
///
/// Relationships leave the parser with a [`TempId`]. The import layer must
/// replace it through [`Relationship::assign_id`] before the relationship is
/// committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RelationshipId {
    Temporary(TempId),
    Assigned(String),
}

/// A relationship placeholder for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Relationship {
    pub id: RelationshipId,
    /// Source concept. `None` until the owning concept has an identifier.
    pub source: Option<ConceptId>,
    pub type_id: ConceptId,
    pub destination: ConceptId,
    /// Role group. 0 is the ungrouped slot used for `Is a`.
    pub group: u32,
    pub characteristic_type: CharacteristicType,
    pub modifier: Modifier,
    pub active: bool,
}

impl Relationship {
    /// Returns true once a permanent identifier has been assigned.
    pub fn is_committed(&self) -> bool {
        matches!(self.id, RelationshipId::Assigned(_))
    }

    /// Replaces the temporary identifier with a permanent one.
    pub fn assign_id(&mut self, id: impl Into<String>) {
        self.id = RelationshipId::Assigned(id.into());
    }

    /// Sets the source concept.
    pub fn with_source(mut self, source: ConceptId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Turns a parsed attribute into a relationship record.
pub trait RelationshipBuilder {
    fn build(
        &self,
        group: u32,
        temp_id: TempId,
        source: Option<&ConceptId>,
        type_id: ConceptId,
        value_id: ConceptId,
    ) -> Relationship;
}

/// Builds active, stated, existential relationships.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatedRelationshipBuilder;

impl RelationshipBuilder for StatedRelationshipBuilder {
    fn build(
        &self,
        group: u32,
        temp_id: TempId,
        source: Option<&ConceptId>,
        type_id: ConceptId,
        value_id: ConceptId,
    ) -> Relationship {
        Relationship {
            id: RelationshipId::Temporary(temp_id),
            source: source.cloned(),
            type_id,
            destination: value_id,
            group,
            characteristic_type: CharacteristicType::Stated,
            modifier: Modifier::Existential,
            active: true,
        }
    }
}
