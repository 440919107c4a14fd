//! Parent-before-child load ordering for a batch of concepts.
//!
//! A concept can only be created once every parent exists. Parents outside
//! the batch are assumed to exist already; parents inside the batch must be
//! loaded first.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::model::Concept;

/// Load order for a batch, as indices into the concept slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOrder {
    /// Every orderable concept, each after all of its in-batch parents.
    pub ordered: Vec<usize>,
    /// Concepts whose parents all lie outside the batch.
    pub roots: Vec<usize>,
    /// Concepts in a parent cycle, or below one, in source order.
    pub unresolved: Vec<usize>,
}

impl LoadOrder {
    /// Returns the position of `index` in the load order, if it was ordered.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.ordered.iter().position(|&i| i == index)
    }
}

/// Computes a parent-first load order.
///
/// Ties are broken by source order, so the result is deterministic. Only
/// concepts that already carry an identifier can be referenced as parents
/// by other rows. When two rows share an identifier the first one is used.
pub fn load_order(concepts: &[Concept]) -> LoadOrder {
    let mut index_by_id: FxHashMap<&str, usize> =
        FxHashMap::with_capacity_and_hasher(concepts.len(), Default::default());
    for (i, concept) in concepts.iter().enumerate() {
        if let Some(id) = &concept.id {
            if let Some(&first) = index_by_id.get(id.as_str()) {
                warn!(id = %id, first_row = concepts[first].row, row = concept.row, "duplicate concept id in batch");
                continue;
            }
            index_by_id.insert(id.as_str(), i);
        }
    }

    let mut pending_parents = vec![0usize; concepts.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); concepts.len()];
    for (i, concept) in concepts.iter().enumerate() {
        let mut seen: Vec<usize> = Vec::with_capacity(concept.parents.len());
        for parent in &concept.parents {
            if let Some(&p) = index_by_id.get(parent.as_str()) {
                if !seen.contains(&p) {
                    seen.push(p);
                    children[p].push(i);
                    pending_parents[i] += 1;
                }
            }
        }
    }

    let roots: Vec<usize> = (0..concepts.len())
        .filter(|&i| pending_parents[i] == 0)
        .collect();
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    let mut ordered = Vec::with_capacity(concepts.len());

    while let Some(i) = queue.pop_front() {
        ordered.push(i);
        for &child in &children[i] {
            pending_parents[child] -= 1;
            if pending_parents[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    let unresolved: Vec<usize> = (0..concepts.len())
        .filter(|&i| pending_parents[i] > 0)
        .collect();
    if !unresolved.is_empty() {
        warn!(count = unresolved.len(), "concepts caught in a parent cycle");
    }
    debug!(
        ordered = ordered.len(),
        roots = roots.len(),
        unresolved = unresolved.len(),
        "computed load order"
    );

    LoadOrder {
        ordered,
        roots,
        unresolved,
    }
}
