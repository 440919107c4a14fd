//! Well-known SNOMED CT metadata concepts used when materializing concepts.

use lazy_static::lazy_static;

use crate::model::ConceptId;

fn id(s: &'static str) -> ConceptId {
    ConceptId::from_trusted(s)
}

lazy_static! {
    /// 116680003 |Is a (attribute)|
    pub static ref IS_A: ConceptId = id("116680003");

    /// 900000000000073002 |Sufficiently defined by necessary conditions definition status|
    pub static ref FULLY_DEFINED: ConceptId = id("900000000000073002");
    /// 900000000000074008 |Not sufficiently defined by necessary conditions definition status|
    pub static ref PRIMITIVE: ConceptId = id("900000000000074008");

    /// 900000000000010007 |Stated relationship|
    pub static ref STATED_RELATIONSHIP: ConceptId = id("900000000000010007");
    /// 900000000000011006 |Inferred relationship|
    pub static ref INFERRED_RELATIONSHIP: ConceptId = id("900000000000011006");
    /// 900000000000227009 |Additional relationship|
    pub static ref ADDITIONAL_RELATIONSHIP: ConceptId = id("900000000000227009");

    /// 900000000000451002 |Existential restriction modifier|
    pub static ref EXISTENTIAL_MODIFIER: ConceptId = id("900000000000451002");
    /// 900000000000450001 |Universal restriction modifier|
    pub static ref UNIVERSAL_MODIFIER: ConceptId = id("900000000000450001");

    /// 900000000000003001 |Fully specified name|
    pub static ref FSN: ConceptId = id("900000000000003001");
    /// 900000000000013009 |Synonym|
    pub static ref SYNONYM: ConceptId = id("900000000000013009");

    /// 900000000000548007 |Preferred|
    pub static ref PREFERRED: ConceptId = id("900000000000548007");
    /// 900000000000549004 |Acceptable|
    pub static ref ACCEPTABLE: ConceptId = id("900000000000549004");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{PartitionKind, validate_sctid};

    #[test]
    fn test_well_known_ids_are_concepts() {
        let all = [
            &*IS_A,
            &*FULLY_DEFINED,
            &*PRIMITIVE,
            &*STATED_RELATIONSHIP,
            &*INFERRED_RELATIONSHIP,
            &*ADDITIONAL_RELATIONSHIP,
            &*EXISTENTIAL_MODIFIER,
            &*UNIVERSAL_MODIFIER,
            &*FSN,
            &*SYNONYM,
            &*PREFERRED,
            &*ACCEPTABLE,
        ];
        for id in all {
            let partition = validate_sctid(id.as_str()).unwrap();
            assert_eq!(partition.kind, PartitionKind::Concept, "{id}");
        }
    }
}
