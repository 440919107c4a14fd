//! Parsed authoring expressions.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::model::well_known;
use crate::model::{ConceptId, Relationship, TempId};

/// Whether a concept's defining attributes are sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DefinitionStatus {
    FullyDefined,
    Primitive,
}

impl DefinitionStatus {
    /// Returns the 3-character authoring marker (`===` or `<<<`).
    pub fn marker(&self) -> &'static str {
        match self {
            DefinitionStatus::FullyDefined => "===",
            DefinitionStatus::Primitive => "<<<",
        }
    }

    /// Returns the metadata concept for this definition status.
    pub fn concept_id(&self) -> &'static ConceptId {
        match self {
            DefinitionStatus::FullyDefined => &well_known::FULLY_DEFINED,
            DefinitionStatus::Primitive => &well_known::PRIMITIVE,
        }
    }
}

/// One `type=value` refinement inside an attribute group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedAttribute {
    /// Parse-time placeholder, `rel_<group>.<index>`.
    pub temp_id: TempId,
    pub type_id: ConceptId,
    pub value_id: ConceptId,
    /// Record produced by the relationship builder for this attribute.
    pub relationship: Relationship,
}

/// A `{...}` block of attributes scoped together.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttributeGroup {
    group_number: u32,
    attributes: Vec<ParsedAttribute>,
}

impl AttributeGroup {
    pub(crate) fn new(group_number: u32, attributes: Vec<ParsedAttribute>) -> Self {
        Self {
            group_number,
            attributes,
        }
    }

    /// 1-based position of this group in the source text.
    pub fn group_number(&self) -> u32 {
        self.group_number
    }

    pub fn attributes(&self) -> &[ParsedAttribute] {
        &self.attributes
    }
}

/// A parsed concept expression.
///
/// Created by a single parse call and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Expression {
    is_fully_defined: bool,
    focus_concepts: Vec<ConceptId>,
    attribute_groups: Vec<AttributeGroup>,
}

impl Expression {
    pub(crate) fn new(
        is_fully_defined: bool,
        focus_concepts: Vec<ConceptId>,
        attribute_groups: Vec<AttributeGroup>,
    ) -> Self {
        Self {
            is_fully_defined,
            focus_concepts,
            attribute_groups,
        }
    }

    pub fn is_fully_defined(&self) -> bool {
        self.is_fully_defined
    }

    pub fn definition_status(&self) -> DefinitionStatus {
        if self.is_fully_defined {
            DefinitionStatus::FullyDefined
        } else {
            DefinitionStatus::Primitive
        }
    }

    /// Parent concepts named before the refinement. Never empty.
    pub fn focus_concepts(&self) -> &[ConceptId] {
        &self.focus_concepts
    }

    pub fn attribute_groups(&self) -> &[AttributeGroup] {
        &self.attribute_groups
    }

    /// Iterates every attribute relationship in group order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.attribute_groups
            .iter()
            .flat_map(|g| g.attributes.iter().map(|a| &a.relationship))
    }

    /// Returns the total number of attributes across all groups.
    pub fn attribute_count(&self) -> usize {
        self.attribute_groups.iter().map(|g| g.attributes.len()).sum()
    }

    /// Computes an order-insensitive SHA-256 fingerprint.
    ///
    /// Two expressions that differ only in the order of focus concepts,
    /// attributes within a group, or groups share a fingerprint.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut focus: Vec<&str> = self.focus_concepts.iter().map(|c| c.as_str()).collect();
        focus.sort_unstable();

        let mut groups: Vec<String> = self
            .attribute_groups
            .iter()
            .map(|g| {
                let mut attrs: Vec<String> = g
                    .attributes
                    .iter()
                    .map(|a| format!("{}={}", a.type_id, a.value_id))
                    .collect();
                attrs.sort_unstable();
                attrs.join(",")
            })
            .collect();
        groups.sort_unstable();

        let mut hasher = Sha256::new();
        hasher.update(self.definition_status().marker());
        hasher.update(focus.join("+"));
        for group in &groups {
            hasher.update(b"{");
            hasher.update(group);
            hasher.update(b"}");
        }
        hasher.finalize().into()
    }
}

/// Renders the normalized authoring form, e.g. `===a+b:{t=v,t=v}{t=v}`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition_status().marker())?;
        for (i, focus) in self.focus_concepts.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{focus}")?;
        }
        if self.attribute_groups.is_empty() {
            return Ok(());
        }
        f.write_str(":")?;
        for group in &self.attribute_groups {
            f.write_str("{")?;
            for (i, attr) in group.attributes.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}={}", attr.type_id, attr.value_id)?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}
