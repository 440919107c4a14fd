//! Builder API for constructing expressions without parsing text.
//!
//! # Example
//!
//! ```rust
//! use snomed_expr::model::builder::ExpressionBuilder;
//!
//! let expr = ExpressionBuilder::primitive()
//!     .focus("71388002")
//!     .group(|g| g.attribute("260686004", "129264002"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(expr.to_string(), "<<<71388002:{260686004=129264002}");
//! ```

use crate::model::{
    AttributeGroup, ConceptId, Expression, ParsedAttribute, RelationshipBuilder,
    StatedRelationshipBuilder, TempId,
};

/// Builder for an [`Expression`].
#[derive(Debug, Clone, Default)]
pub struct ExpressionBuilder {
    is_fully_defined: bool,
    focus_concepts: Vec<String>,
    groups: Vec<GroupBuilder>,
}

impl ExpressionBuilder {
    /// Starts a fully defined expression.
    pub fn fully_defined() -> Self {
        Self {
            is_fully_defined: true,
            ..Self::default()
        }
    }

    /// Starts a primitive expression.
    pub fn primitive() -> Self {
        Self::default()
    }

    /// Adds a focus concept.
    pub fn focus(mut self, id: impl Into<String>) -> Self {
        self.focus_concepts.push(id.into());
        self
    }

    /// Adds an attribute group using a builder function.
    pub fn group<F>(mut self, f: F) -> Self
    where
        F: FnOnce(GroupBuilder) -> GroupBuilder,
    {
        self.groups.push(f(GroupBuilder::default()));
        self
    }

    /// Builds the expression with stated relationships.
    pub fn build(self) -> Option<Expression> {
        self.build_with(&StatedRelationshipBuilder)
    }

    /// Builds the expression, returning `None` if there is no focus concept,
    /// a group is empty, or any identifier is empty.
    pub fn build_with(self, builder: &impl RelationshipBuilder) -> Option<Expression> {
        if self.focus_concepts.is_empty() {
            return None;
        }
        let focus_concepts = self
            .focus_concepts
            .into_iter()
            .map(ConceptId::new)
            .collect::<Option<Vec<_>>>()?;

        let mut groups = Vec::with_capacity(self.groups.len());
        for (i, group) in self.groups.into_iter().enumerate() {
            if group.attributes.is_empty() {
                return None;
            }
            let group_number = i as u32 + 1;
            let mut attributes = Vec::with_capacity(group.attributes.len());
            for (index, (type_id, value_id)) in group.attributes.into_iter().enumerate() {
                let type_id = ConceptId::new(type_id)?;
                let value_id = ConceptId::new(value_id)?;
                let temp_id = TempId::new(group_number, index);
                let relationship =
                    builder.build(group_number, temp_id, None, type_id.clone(), value_id.clone());
                attributes.push(ParsedAttribute {
                    temp_id,
                    type_id,
                    value_id,
                    relationship,
                });
            }
            groups.push(AttributeGroup::new(group_number, attributes));
        }

        Some(Expression::new(self.is_fully_defined, focus_concepts, groups))
    }
}

/// Builder for one attribute group.
#[derive(Debug, Clone, Default)]
pub struct GroupBuilder {
    attributes: Vec<(String, String)>,
}

impl GroupBuilder {
    /// Adds a `type=value` attribute.
    pub fn attribute(mut self, type_id: impl Into<String>, value_id: impl Into<String>) -> Self {
        self.attributes.push((type_id.into(), value_id.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    #[test]
    fn test_builder_matches_parser() {
        let built = ExpressionBuilder::fully_defined()
            .focus("71388002")
            .group(|g| {
                g.attribute("260686004", "129264002")
                    .attribute("116680003", "73211009")
            })
            .group(|g| g.attribute("363698007", "39057004"))
            .build()
            .unwrap();

        let parsed = parse_expression(
            "===71388002:{260686004=129264002,116680003=73211009}{363698007=39057004}",
        )
        .unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_builder_rejects_incomplete() {
        assert!(ExpressionBuilder::primitive().build().is_none());
        assert!(ExpressionBuilder::primitive().focus("").build().is_none());
        assert!(
            ExpressionBuilder::primitive()
                .focus("1")
                .group(|g| g)
                .build()
                .is_none()
        );
        assert!(
            ExpressionBuilder::primitive()
                .focus("1")
                .group(|g| g.attribute("2", ""))
                .build()
                .is_none()
        );
    }
}
