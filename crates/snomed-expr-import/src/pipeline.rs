//! Batch import pipeline.
//!
//! Rows are parsed in parallel, then ordered parents-first. Identifiers are
//! allocated sequentially while walking that order, so a re-run over the
//! same sheet and config produces the same identifiers.

use std::collections::hash_map::Entry;

use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use snomed_expr::{
    Acceptability, AllocationError, Concept, ConceptId, Description, PartitionKind,
    Relationship, SctidAllocator, ValidationError, load_order, parse_expression,
    validate_expression, validate_sctid,
};
use tracing::{debug, warn};

use crate::config::ImportConfig;
use crate::report::{DescriptionReport, RowReport, RowStatus};
use crate::rows::SourceRow;

struct Rejection {
    reason: String,
    code: Option<&'static str>,
}

impl Rejection {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            code: None,
        }
    }
}

/// Turns one row into a concept record.
fn prepare(row: &SourceRow, config: &ImportConfig) -> Result<Concept, Rejection> {
    let expression = parse_expression(&row.expression).map_err(|err| Rejection {
        reason: err.to_string(),
        code: Some(err.code().code()),
    })?;

    if config.validate_ids {
        validate_expression(&expression).map_err(|err| Rejection::new(err.to_string()))?;
        if let Some(id) = &row.id {
            let partition = validate_sctid(id)
                .map_err(|err| Rejection::new(format!("invalid concept id {id}: {err}")))?;
            if partition.kind != PartitionKind::Concept {
                return Err(Rejection::new(
                    ValidationError::NotAConcept {
                        id: id.clone(),
                        actual: partition.kind,
                    }
                    .to_string(),
                ));
            }
        }
    }

    let id = row.id.clone().and_then(ConceptId::new);
    let mut concept = Concept::new(row.row, id, expression);
    if let Some(fsn) = &row.fsn {
        concept = concept.with_description(Description::fsn(fsn));
    }
    for (i, synonym) in row.synonyms.iter().enumerate() {
        let acceptability = if i == 0 {
            Acceptability::Preferred
        } else {
            Acceptability::Acceptable
        };
        concept = concept.with_description(Description::synonym(synonym, acceptability));
    }
    if let Some(documentation) = &row.documentation {
        concept = concept.with_documentation(documentation);
    }
    Ok(concept)
}

/// Runs the import over loaded rows and returns one report per row, in
/// source order.
///
/// Malformed rows are reported as failed and never stop the batch. Only
/// environment problems, such as an exhausted namespace, return an error.
pub fn run(rows: &[SourceRow], config: &ImportConfig) -> Result<Vec<RowReport>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or(0))
        .build()
        .context("Failed to build parser thread pool")?;
    let prepared: Vec<Result<Concept, Rejection>> =
        pool.install(|| rows.par_iter().map(|row| prepare(row, config)).collect());

    let mut reports: Vec<Option<RowReport>> = vec![None; rows.len()];
    let mut concepts = Vec::with_capacity(rows.len());
    // concept index -> row index
    let mut source_index = Vec::with_capacity(rows.len());
    // sheet id -> first row that defines it
    let mut defined_in: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, (row, result)) in rows.iter().zip(prepared).enumerate() {
        let result = match (result, row.id.as_deref()) {
            (Ok(concept), Some(id)) => match defined_in.entry(id) {
                Entry::Occupied(first) => Err(Rejection::new(format!(
                    "duplicate concept id, first defined in row {}",
                    first.get()
                ))),
                Entry::Vacant(slot) => {
                    slot.insert(row.row);
                    Ok(concept)
                }
            },
            (result, _) => result,
        };
        match result {
            Ok(concept) => {
                concepts.push(concept);
                source_index.push(i);
            }
            Err(rejection) => {
                warn!(row = row.row, reason = %rejection.reason, "row rejected");
                reports[i] = Some(RowReport::failed(
                    row.row,
                    row.id.clone(),
                    rejection.reason,
                    rejection.code,
                ));
            }
        }
    }

    let order = load_order(&concepts);
    for &c in &order.unresolved {
        let i = source_index[c];
        warn!(row = rows[i].row, "row is caught in a parent cycle");
        reports[i] = Some(RowReport::failed(
            rows[i].row,
            rows[i].id.clone(),
            "parent cycle within the batch",
            None,
        ));
    }

    let duplicate_of = find_duplicates(&concepts, &order.ordered);

    // Ids written in the sheet, including those of failed rows.
    let taken: FxHashSet<&str> = rows.iter().filter_map(|row| row.id.as_deref()).collect();
    let concept_ids =
        SctidAllocator::new(config.namespace, PartitionKind::Concept, config.concept_start)?;
    let relationship_ids = SctidAllocator::new(
        config.namespace,
        PartitionKind::Relationship,
        config.relationship_start,
    )?;

    for (position, &c) in order.ordered.iter().enumerate() {
        let concept = &mut concepts[c];
        let row = concept.row;
        if concept.needs_id() {
            let id = allocate_free(&concept_ids, &taken)
                .with_context(|| format!("Failed to allocate concept id for row {row}"))?;
            debug!(row, id = %id, "allocated concept id");
            concept.id = Some(id);
        }

        let mut relationships = concept.relationships();
        for relationship in &mut relationships {
            let id = relationship_ids
                .allocate()
                .with_context(|| format!("Failed to allocate relationship id for row {row}"))?;
            relationship.assign_id(id);
        }
        debug_assert!(relationships.iter().all(Relationship::is_committed));

        reports[source_index[c]] = Some(RowReport {
            row: concept.row,
            concept_id: concept.id.as_ref().map(ConceptId::to_string),
            status: RowStatus::Created,
            reason: None,
            code: None,
            load_position: Some(position),
            expression: Some(concept.expression.to_string()),
            duplicate_of: duplicate_of[c],
            descriptions: concept.descriptions.iter().map(DescriptionReport::from).collect(),
            relationships,
        });
    }

    Ok(reports.into_iter().flatten().collect())
}

/// Allocates the next concept id not already used by the sheet.
fn allocate_free(
    allocator: &SctidAllocator,
    taken: &FxHashSet<&str>,
) -> Result<ConceptId, AllocationError> {
    loop {
        let id = allocator.allocate_concept()?;
        if !taken.contains(id.as_str()) {
            return Ok(id);
        }
        debug!(id = %id, "skipping id already present in the sheet");
    }
}

/// Maps each ordered concept whose definition repeats an earlier row to that
/// row's number.
fn find_duplicates(concepts: &[Concept], ordered: &[usize]) -> Vec<Option<usize>> {
    let mut by_source = ordered.to_vec();
    by_source.sort_unstable();

    let mut first_seen: FxHashMap<[u8; 32], usize> = FxHashMap::default();
    let mut duplicate_of = vec![None; concepts.len()];
    for c in by_source {
        match first_seen.entry(concepts[c].expression.fingerprint()) {
            Entry::Occupied(first) => {
                let first_row = concepts[*first.get()].row;
                warn!(row = concepts[c].row, first_row, "duplicate definition");
                duplicate_of[c] = Some(first_row);
            }
            Entry::Vacant(slot) => {
                slot.insert(c);
            }
        }
    }
    duplicate_of
}
