//! Per-row concept records consumed by the batch loader.

use crate::model::well_known;
use crate::model::{ConceptId, Expression, Relationship, RelationshipId, TempId};

/// Kind of description attached to a new concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DescriptionType {
    Fsn,
    Synonym,
}

impl DescriptionType {
    pub fn concept_id(&self) -> &'static ConceptId {
        match self {
            DescriptionType::Fsn => &well_known::FSN,
            DescriptionType::Synonym => &well_known::SYNONYM,
        }
    }
}

/// Language reference set acceptability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Acceptability {
    Preferred,
    Acceptable,
}

impl Acceptability {
    pub fn concept_id(&self) -> &'static ConceptId {
        match self {
            Acceptability::Preferred => &well_known::PREFERRED,
            Acceptability::Acceptable => &well_known::ACCEPTABLE,
        }
    }
}

/// A description waiting to be created with its concept.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Description {
    pub term: String,
    pub description_type: DescriptionType,
    pub language_code: String,
    pub acceptability: Acceptability,
}

impl Description {
    /// Creates a preferred English fully specified name.
    pub fn fsn(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            description_type: DescriptionType::Fsn,
            language_code: "en".to_string(),
            acceptability: Acceptability::Preferred,
        }
    }

    /// Creates an English synonym.
    pub fn synonym(term: impl Into<String>, acceptability: Acceptability) -> Self {
        Self {
            term: term.into(),
            description_type: DescriptionType::Synonym,
            language_code: "en".to_string(),
            acceptability,
        }
    }

    /// Returns the semantic tag of an FSN, e.g. `disorder` for
    /// `Fracture of femur (disorder)`.
    pub fn semantic_tag(&self) -> Option<&str> {
        let term = self.term.trim_end();
        let inner = term.strip_suffix(')')?;
        let open = inner.rfind('(')?;
        let tag = &inner[open + 1..];
        if tag.is_empty() { None } else { Some(tag) }
    }
}

/// One source row prepared for loading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Concept {
    /// 1-based row number in the source sheet.
    pub row: usize,
    /// `None` when the row still needs an identifier.
    pub id: Option<ConceptId>,
    /// Parents, taken from the expression's focus concepts.
    pub parents: Vec<ConceptId>,
    pub expression: Expression,
    pub documentation: Option<String>,
    pub descriptions: Vec<Description>,
}

impl Concept {
    /// Creates a concept record for a parsed row.
    pub fn new(row: usize, id: Option<ConceptId>, expression: Expression) -> Self {
        Self {
            row,
            id,
            parents: expression.focus_concepts().to_vec(),
            expression,
            documentation: None,
            descriptions: Vec::new(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.descriptions.push(description);
        self
    }

    /// Returns true when the row needs a newly allocated identifier.
    pub fn needs_id(&self) -> bool {
        self.id.is_none()
    }

    /// Returns the preferred fully specified name, if any.
    pub fn fsn(&self) -> Option<&Description> {
        self.descriptions
            .iter()
            .find(|d| d.description_type == DescriptionType::Fsn)
    }

    /// Builds the group-0 `Is a` relationships for every parent.
    ///
    /// Temporary identifiers use group 0, `rel_0.<index>`.
    pub fn is_a_relationships(&self) -> Vec<Relationship> {
        self.parents
            .iter()
            .enumerate()
            .map(|(index, parent)| Relationship {
                id: RelationshipId::Temporary(TempId::new(0, index)),
                source: self.id.clone(),
                type_id: (*well_known::IS_A).clone(),
                destination: parent.clone(),
                group: 0,
                characteristic_type: Default::default(),
                modifier: Default::default(),
                active: true,
            })
            .collect()
    }

    /// Returns every relationship of this concept: `Is a` first, then the
    /// attribute relationships, each with the concept as source.
    pub fn relationships(&self) -> Vec<Relationship> {
        let mut all = self.is_a_relationships();
        all.extend(self.expression.relationships().map(|r| {
            let mut rel = r.clone();
            rel.source = self.id.clone();
            rel
        }));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    #[test]
    fn test_parents_follow_focus_concepts() {
        let expr = parse_expression("===71388002+64572001").unwrap();
        let concept = Concept::new(2, None, expr);
        assert_eq!(concept.parents.len(), 2);
        assert_eq!(concept.parents[1].as_str(), "64572001");
        assert!(concept.needs_id());
    }

    #[test]
    fn test_relationships_include_is_a() {
        let expr = parse_expression("<<<71388002:{260686004=129264002}").unwrap();
        let id = ConceptId::new("1234567001").unwrap();
        let concept = Concept::new(1, Some(id.clone()), expr);

        let rels = concept.relationships();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].type_id, *well_known::IS_A);
        assert_eq!(rels[0].group, 0);
        assert_eq!(rels[0].id, RelationshipId::Temporary(TempId::new(0, 0)));
        assert_eq!(rels[1].group, 1);
        assert!(rels.iter().all(|r| r.source.as_ref() == Some(&id)));
    }

    #[test]
    fn test_semantic_tag() {
        assert_eq!(
            Description::fsn("Fracture of femur (disorder)").semantic_tag(),
            Some("disorder")
        );
        assert_eq!(Description::fsn("No tag").semantic_tag(), None);
        assert_eq!(Description::fsn("Empty ()").semantic_tag(), None);
    }

    #[test]
    fn test_fsn_lookup() {
        let expr = parse_expression("===71388002").unwrap();
        let concept = Concept::new(1, None, expr)
            .with_description(Description::synonym("Thing", Acceptability::Acceptable))
            .with_description(Description::fsn("Thing (finding)"));
        assert_eq!(concept.fsn().map(|d| d.term.as_str()), Some("Thing (finding)"));
    }
}
