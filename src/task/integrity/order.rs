//! Prerequisite-respecting task order for schedulers.

use super::{CycleDetector, IntegrityError};
use crate::task::domain::TaskId;
use crate::task::ports::TaskGraph;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Orders every stored task so that prerequisites come before dependents.
///
/// Ties are broken by task id so the order is stable for a given graph.
///
/// # Errors
///
/// Returns [`IntegrityError::PrerequisiteCycle`] when the stored graph is not
/// a DAG. This can only happen after an unvalidated bulk load.
pub fn scheduling_order<G>(graph: &G) -> Result<Vec<TaskId>, IntegrityError>
where
    G: TaskGraph + ?Sized,
{
    let ids = graph.task_ids();
    let mut waiting_on: HashMap<TaskId, usize> = ids
        .iter()
        .map(|id| (*id, graph.prerequisites_of(*id).len()))
        .collect();
    let mut ready: BTreeSet<TaskId> = waiting_on
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut order = Vec::with_capacity(ids.len());
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for dependent in graph.dependents_of(next) {
            if let Some(count) = waiting_on.get_mut(&dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() == ids.len() {
        return Ok(order);
    }

    let placed: HashSet<TaskId> = order.iter().copied().collect();
    match ids.into_iter().find(|id| !placed.contains(id)) {
        Some(blocked) => Err(cycle_at(graph, blocked)),
        None => Ok(order),
    }
}

/// Names the node that closes the cycle reachable from `blocked`.
fn cycle_at<G>(graph: &G, blocked: TaskId) -> IntegrityError
where
    G: TaskGraph + ?Sized,
{
    CycleDetector::new()
        .prerequisite_cycle(graph, blocked)
        .err()
        .map_or(IntegrityError::PrerequisiteCycle { task_id: blocked }, Into::into)
}
