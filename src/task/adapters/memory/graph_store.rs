//! In-memory task graph store.
//!
//! Tasks live in an arena keyed by id. Parent links are indexed in reverse as
//! child sets, and prerequisite edges are kept as forward and reverse
//! adjacency sets, so no record holds a live reference to another.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId, TimeEntry, TimeEntryId},
    ports::{
        GraphTransaction, TaskGraph, TaskGraphStore, TaskGraphStoreError, TaskGraphStoreResult,
    },
};

/// Thread-safe in-memory task graph store.
///
/// A transaction holds the write lock for its whole duration and works on a
/// staged copy of the graph, which replaces the live graph only when the
/// transaction succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskGraphStore {
    state: Arc<RwLock<GraphState>>,
}

#[derive(Debug, Clone, Default)]
struct GraphState {
    tasks: HashMap<TaskId, Task>,
    children: HashMap<TaskId, BTreeSet<TaskId>>,
    prerequisites: HashMap<TaskId, BTreeSet<TaskId>>,
    dependents: HashMap<TaskId, BTreeSet<TaskId>>,
    time_entries: HashMap<TimeEntryId, TimeEntry>,
    entries_by_task: HashMap<TaskId, Vec<TimeEntryId>>,
}

impl InMemoryTaskGraphStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: &impl std::fmt::Display) -> TaskGraphStoreError {
    TaskGraphStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// Removes `id` from the set stored under `key`, dropping the set once empty.
fn unlink<K, V>(index: &mut HashMap<K, BTreeSet<V>>, key: &K, id: &V)
where
    K: std::hash::Hash + Eq,
    V: Ord,
{
    if let Some(ids) = index.get_mut(key) {
        ids.remove(id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

fn ids_in<V: Copy>(index: &HashMap<TaskId, BTreeSet<V>>, key: TaskId) -> Vec<V> {
    index
        .get(&key)
        .map(|ids| ids.iter().copied().collect())
        .unwrap_or_default()
}

impl GraphState {
    fn require_task(&self, id: TaskId) -> TaskGraphStoreResult<()> {
        if self.tasks.contains_key(&id) {
            Ok(())
        } else {
            Err(TaskGraphStoreError::TaskNotFound(id))
        }
    }

    fn require_parent(&self, task: &Task) -> TaskGraphStoreResult<()> {
        task.parent()
            .map_or(Ok(()), |parent| self.require_task(parent))
    }

    fn link_parent(&mut self, task: &Task) {
        if let Some(parent) = task.parent() {
            self.children.entry(parent).or_default().insert(task.id());
        }
    }

    fn store_task(&mut self, task: &Task) {
        let mut stored = task.clone();
        stored.mark_committed();
        self.link_parent(&stored);
        self.tasks.insert(stored.id(), stored);
    }

    fn store_time_entry(&mut self, entry: &TimeEntry) {
        let mut stored = entry.clone();
        stored.mark_committed();
        self.entries_by_task
            .entry(stored.task())
            .or_default()
            .push(stored.id());
        self.time_entries.insert(stored.id(), stored);
    }

    fn unlink_time_entry(&mut self, entry: &TimeEntry) {
        if let Some(ids) = self.entries_by_task.get_mut(&entry.task()) {
            ids.retain(|id| *id != entry.id());
            if ids.is_empty() {
                self.entries_by_task.remove(&entry.task());
            }
        }
    }

    /// Collects `root` and its descendants, root first.
    ///
    /// Tolerates a cyclic parent index left behind by an unvalidated load.
    fn subtree(&self, root: TaskId) -> Vec<TaskId> {
        let mut seen = HashSet::from([root]);
        let mut order = vec![root];
        let mut cursor = 0;
        while let Some(&current) = order.get(cursor) {
            cursor += 1;
            for child in ids_in(&self.children, current) {
                if seen.insert(child) {
                    order.push(child);
                }
            }
        }
        order
    }

    fn remove_single_task(&mut self, id: TaskId) {
        let Some(task) = self.tasks.remove(&id) else {
            return;
        };
        if let Some(parent) = task.parent() {
            unlink(&mut self.children, &parent, &id);
        }
        self.children.remove(&id);

        for prerequisite in ids_in(&self.prerequisites, id) {
            unlink(&mut self.dependents, &prerequisite, &id);
        }
        self.prerequisites.remove(&id);
        for dependent in ids_in(&self.dependents, id) {
            unlink(&mut self.prerequisites, &dependent, &id);
        }
        self.dependents.remove(&id);

        for entry_id in self.entries_by_task.remove(&id).unwrap_or_default() {
            self.time_entries.remove(&entry_id);
        }
    }
}

impl TaskGraph for GraphState {
    fn contains_task(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    fn find_task(&self, id: TaskId) -> Option<Task> {
        self.tasks.get(&id).cloned()
    }

    fn parent_of(&self, id: TaskId) -> Option<TaskId> {
        self.tasks.get(&id).and_then(Task::parent)
    }

    fn children_of(&self, id: TaskId) -> Vec<TaskId> {
        ids_in(&self.children, id)
    }

    fn has_children(&self, id: TaskId) -> bool {
        self.children.get(&id).is_some_and(|ids| !ids.is_empty())
    }

    fn prerequisites_of(&self, id: TaskId) -> Vec<TaskId> {
        ids_in(&self.prerequisites, id)
    }

    fn dependents_of(&self, id: TaskId) -> Vec<TaskId> {
        ids_in(&self.dependents, id)
    }

    fn find_time_entry(&self, id: TimeEntryId) -> Option<TimeEntry> {
        self.time_entries.get(&id).cloned()
    }

    fn time_entries_for(&self, id: TaskId) -> Vec<TimeEntry> {
        self.entries_by_task
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|entry_id| self.time_entries.get(entry_id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn task_ids(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.tasks.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl GraphTransaction for GraphState {
    fn insert_task(&mut self, task: &Task) -> TaskGraphStoreResult<()> {
        if self.tasks.contains_key(&task.id()) {
            return Err(TaskGraphStoreError::DuplicateTask(task.id()));
        }
        self.require_parent(task)?;
        self.store_task(task);
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> TaskGraphStoreResult<()> {
        let old_parent = self
            .tasks
            .get(&task.id())
            .ok_or(TaskGraphStoreError::TaskNotFound(task.id()))?
            .parent();
        self.require_parent(task)?;

        if let Some(parent) = old_parent {
            unlink(&mut self.children, &parent, &task.id());
        }
        self.store_task(task);
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> TaskGraphStoreResult<Vec<TaskId>> {
        self.require_task(id)?;
        let removed = self.subtree(id);
        for task_id in &removed {
            self.remove_single_task(*task_id);
        }
        Ok(removed)
    }

    fn insert_prerequisite(
        &mut self,
        task: TaskId,
        prerequisite: TaskId,
    ) -> TaskGraphStoreResult<bool> {
        self.require_task(task)?;
        self.require_task(prerequisite)?;
        let added = self
            .prerequisites
            .entry(task)
            .or_default()
            .insert(prerequisite);
        self.dependents.entry(prerequisite).or_default().insert(task);
        Ok(added)
    }

    fn remove_prerequisite(
        &mut self,
        task: TaskId,
        prerequisite: TaskId,
    ) -> TaskGraphStoreResult<bool> {
        self.require_task(task)?;
        let existed = self
            .prerequisites
            .get(&task)
            .is_some_and(|ids| ids.contains(&prerequisite));
        unlink(&mut self.prerequisites, &task, &prerequisite);
        unlink(&mut self.dependents, &prerequisite, &task);
        Ok(existed)
    }

    fn insert_time_entry(&mut self, entry: &TimeEntry) -> TaskGraphStoreResult<()> {
        if self.time_entries.contains_key(&entry.id()) {
            return Err(TaskGraphStoreError::DuplicateTimeEntry(entry.id()));
        }
        self.require_task(entry.task())?;
        self.store_time_entry(entry);
        Ok(())
    }

    fn update_time_entry(&mut self, entry: &TimeEntry) -> TaskGraphStoreResult<()> {
        let old_entry = self
            .time_entries
            .get(&entry.id())
            .ok_or(TaskGraphStoreError::TimeEntryNotFound(entry.id()))?
            .clone();
        self.require_task(entry.task())?;

        self.unlink_time_entry(&old_entry);
        self.store_time_entry(entry);
        Ok(())
    }
}

impl TaskGraphStore for InMemoryTaskGraphStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GraphTransaction) -> Result<T, E>,
        E: From<TaskGraphStoreError>,
    {
        let mut live = self.state.write().map_err(|err| E::from(poisoned(&err)))?;
        let mut staged = live.clone();
        let outcome = work(&mut staged)?;
        *live = staged;
        Ok(outcome)
    }

    fn read<T, F>(&self, query: F) -> TaskGraphStoreResult<T>
    where
        F: FnOnce(&dyn GraphTransaction) -> T,
    {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(query(&*state))
    }
}
