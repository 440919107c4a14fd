//! Parsing of bulk-authoring expressions.
//!
//! The accepted grammar, after captions and spaces are removed:
//!
//! ```text
//! expression      := def-status focus-concepts [ ":" groups ]
//! def-status      := "===" | "<<<"
//! focus-concepts  := concept-id { "+" concept-id }
//! groups          := "{" group-body { "{" group-body } "}"
//! group-body      := attribute { "," attribute }
//! attribute       := concept-id "=" concept-id
//! ```
//!
//! Every non-empty refinement must be wrapped in at least one `{...}` group.
//! Bare attributes directly after the `:` are rejected. Nested expressions
//! and concrete values are not part of this format.

pub mod extract;
pub mod normalize;
pub mod scanner;

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::model::{ConceptId, Expression, RelationshipBuilder, StatedRelationshipBuilder};

pub use extract::{
    extract_definition_status, extract_focus_concepts, extract_groups, parse_group,
};
pub use normalize::normalize;
pub use scanner::Scanner;

/// Parses an expression, materializing attributes as stated relationships.
pub fn parse_expression(raw: &str) -> Result<Expression, ParseError> {
    parse_expression_with(raw, &StatedRelationshipBuilder)
}

/// Parses an expression using a custom relationship builder.
///
/// Stages run in strict order and the first error is returned. The function
/// keeps no state between calls and may be called from many threads at once.
pub fn parse_expression_with(
    raw: &str,
    builder: &impl RelationshipBuilder,
) -> Result<Expression, ParseError> {
    let result = parse_normalized(&normalize(raw), builder);
    match &result {
        Ok(expression) => trace!(
            focus_concepts = expression.focus_concepts().len(),
            groups = expression.attribute_groups().len(),
            "parsed expression"
        ),
        Err(err) => debug!(code = err.code().code(), error = %err, "rejected expression"),
    }
    result
}

fn parse_normalized(
    buf: &str,
    builder: &impl RelationshipBuilder,
) -> Result<Expression, ParseError> {
    let (is_fully_defined, rest) = extract_definition_status(buf)?;

    let (focus, rest) = extract_focus_concepts(rest);
    if focus.is_empty() {
        return Err(ParseError::MissingFocusConcept);
    }
    let focus_concepts = focus
        .into_iter()
        .filter_map(ConceptId::new)
        .collect::<Vec<_>>();

    let attribute_groups = extract_groups(rest)?
        .iter()
        .enumerate()
        .map(|(i, body)| parse_group(i as u32 + 1, body, builder))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Expression::new(is_fully_defined, focus_concepts, attribute_groups))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ErrorCode;
    use crate::model::{
        CharacteristicType, ExpressionBuilder, Modifier, Relationship, RelationshipId, TempId,
    };

    fn attr_pairs(expr: &Expression, group: usize) -> Vec<(String, String, String)> {
        expr.attribute_groups()[group]
            .attributes()
            .iter()
            .map(|a| {
                (
                    a.temp_id.to_string(),
                    a.type_id.to_string(),
                    a.value_id.to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_primitive_single_attribute() {
        let expr = parse_expression("<<<71388002:{260686004=129264002}").unwrap();

        assert!(!expr.is_fully_defined());
        assert_eq!(expr.focus_concepts().len(), 1);
        assert_eq!(expr.focus_concepts()[0].as_str(), "71388002");
        assert_eq!(expr.attribute_groups().len(), 1);
        assert_eq!(expr.attribute_groups()[0].group_number(), 1);
        assert_eq!(
            attr_pairs(&expr, 0),
            vec![(
                "rel_1.0".to_string(),
                "260686004".to_string(),
                "129264002".to_string()
            )]
        );
    }

    #[test]
    fn test_captions_and_spaces_parse_identically() {
        let plain = parse_expression("<<<71388002:{260686004=129264002}").unwrap();
        let captioned = parse_expression(
            "<<< 71388002 |Some finding (finding)| : { 260686004 |Associated morphology|=129264002 |Abc (disorder)| }",
        )
        .unwrap();
        assert_eq!(plain, captioned);
    }

    #[test]
    fn test_multiple_focus_without_refinement() {
        let expr = parse_expression("===71388002+64572001").unwrap();

        assert!(expr.is_fully_defined());
        let focus: Vec<&str> = expr.focus_concepts().iter().map(|c| c.as_str()).collect();
        assert_eq!(focus, vec!["71388002", "64572001"]);
        assert!(expr.attribute_groups().is_empty());
    }

    #[test]
    fn test_two_attributes_in_one_group() {
        let expr =
            parse_expression("===71388002:{260686004=129264002,116680003=73211009}").unwrap();

        assert_eq!(expr.attribute_groups().len(), 1);
        let ids: Vec<String> = attr_pairs(&expr, 0).into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec!["rel_1.0", "rel_1.1"]);
    }

    #[test]
    fn test_two_groups() {
        let expr =
            parse_expression("===71388002:{260686004=129264002}{116680003=73211009}").unwrap();

        let numbers: Vec<u32> = expr
            .attribute_groups()
            .iter()
            .map(|g| g.group_number())
            .collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(attr_pairs(&expr, 1)[0].0, "rel_2.0");
    }

    #[test]
    fn test_unknown_definition_status() {
        let result = parse_expression("xyz71388002");
        assert!(matches!(
            result,
            Err(ParseError::UnknownDefinitionStatus { .. })
        ));
        assert_eq!(
            result.unwrap_err().code(),
            ErrorCode::UnknownDefinitionStatus
        );
    }

    #[test]
    fn test_missing_braces() {
        let result = parse_expression("===71388002:260686004=129264002");
        assert!(matches!(
            result,
            Err(ParseError::MalformedGroupStructure { .. })
        ));
    }

    #[test]
    fn test_missing_equals() {
        let result = parse_expression("===71388002:{260686004}");
        assert_eq!(
            result,
            Err(ParseError::MalformedAttribute {
                group_number: 1,
                attribute_text: "260686004".to_string()
            })
        );
    }

    #[test]
    fn test_missing_focus_concept() {
        assert_eq!(parse_expression("==="), Err(ParseError::MissingFocusConcept));
        assert_eq!(
            parse_expression("<<<:{1=2}"),
            Err(ParseError::MissingFocusConcept)
        );
        assert_eq!(
            parse_expression("<<< |caption only|"),
            Err(ParseError::MissingFocusConcept)
        );
    }

    #[test]
    fn test_colon_without_refinement() {
        let expr = parse_expression("===71388002:").unwrap();
        assert!(expr.attribute_groups().is_empty());
    }

    #[test]
    fn test_failure_in_later_group_aborts() {
        let result = parse_expression("===1:{2=3}{4=5,6}");
        assert_eq!(
            result,
            Err(ParseError::MalformedAttribute {
                group_number: 2,
                attribute_text: "6".to_string()
            })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = parse_expression("===1:2=3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[P003] refinement must start with '{', found \"2=3\""
        );
    }

    struct InferredBuilder;

    impl RelationshipBuilder for InferredBuilder {
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
                characteristic_type: CharacteristicType::Inferred,
                modifier: Modifier::Universal,
                active: false,
            }
        }
    }

    #[test]
    fn test_custom_relationship_builder() {
        let expr = parse_expression_with("===1:{2=3}{4=5}", &InferredBuilder).unwrap();
        assert_eq!(expr.relationships().count(), 2);
        for rel in expr.relationships() {
            assert_eq!(rel.characteristic_type, CharacteristicType::Inferred);
            assert_eq!(rel.modifier, Modifier::Universal);
            assert!(!rel.active);
        }
    }

    #[test]
    fn test_concurrent_parsing() {
        let inputs: Vec<String> = (0..64)
            .map(|i| format!("==={i}:{{260686004={i}}}{{116680003=73211009}}"))
            .collect();
        let handles: Vec<_> = inputs
            .chunks(16)
            .map(|chunk| {
                let chunk = chunk.to_vec();
                std::thread::spawn(move || {
                    chunk
                        .iter()
                        .map(|raw| parse_expression(raw).map(|e| e.to_string()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let outputs: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        for (raw, out) in inputs.iter().zip(outputs) {
            assert_eq!(&out.unwrap(), raw);
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn sctid() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[1-9][0-9]{5,17}").unwrap()
    }

    fn group() -> impl Strategy<Value = Vec<(String, String)>> {
        proptest::collection::vec((sctid(), sctid()), 1..4)
    }

    fn built_expression() -> impl Strategy<Value = Expression> {
        (
            any::<bool>(),
            proptest::collection::vec(sctid(), 1..4),
            proptest::collection::vec(group(), 0..4),
        )
            .prop_map(|(fully_defined, focus, groups)| {
                let mut builder = if fully_defined {
                    ExpressionBuilder::fully_defined()
                } else {
                    ExpressionBuilder::primitive()
                };
                for f in focus {
                    builder = builder.focus(f);
                }
                for attrs in groups {
                    builder = builder.group(|mut g| {
                        for (t, v) in attrs {
                            g = g.attribute(t, v);
                        }
                        g
                    });
                }
                builder.build().unwrap()
            })
    }

    fn caption() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[A-Za-z ()]{0,20}").unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn group_numbers_are_contiguous(expr in built_expression()) {
            let parsed = parse_expression(&expr.to_string()).unwrap();
            for (i, group) in parsed.attribute_groups().iter().enumerate() {
                prop_assert_eq!(group.group_number(), i as u32 + 1);
                for (j, attr) in group.attributes().iter().enumerate() {
                    prop_assert_eq!(attr.temp_id, TempId::new(i as u32 + 1, j));
                }
            }
            prop_assert!(!parsed.focus_concepts().is_empty());
            prop_assert_eq!(parsed, expr);
        }

        #[test]
        fn captions_do_not_change_result(
            focus in sctid(),
            type_id in sctid(),
            value_id in sctid(),
            c1 in caption(),
            c2 in caption(),
        ) {
            let plain = format!("<<<{focus}:{{{type_id}={value_id}}}");
            let captioned = format!("<<< {focus} |{c1}| : {{ {type_id} |{c2}| = {value_id} }}");
            prop_assert_eq!(parse_expression(&plain), parse_expression(&captioned));
        }

        #[test]
        fn normalize_is_idempotent(raw in "[0-9=<:+{},| a-z]{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn parsing_is_pure(raw in "[0-9=<:+{},| ]{0,40}") {
            prop_assert_eq!(parse_expression(&raw), parse_expression(&raw));
        }
    }
}
