use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, warn};
use ulid::Generator;

use crate::error::{StorageError, StoreError};
use crate::model::{normalize_text, Counts, Task};
use crate::storage::TaskStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(Task),
    /// Unknown id or blank replacement text; nothing changed.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearAllOutcome {
    pub removed: usize,
}

impl ClearAllOutcome {
    pub fn was_empty(&self) -> bool {
        self.removed == 0
    }
}

/// The authoritative, newest-first task collection.
///
/// Every successful mutation writes the full collection back through [`TaskStorage`].
/// A failed write leaves the in-memory change applied and is retried on the next mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: TaskStorage,
    ids: Generator,
    synced: bool,
}

impl TaskStore {
    /// Empty store; call [`TaskStore::load`] to read the persisted collection.
    pub fn new(storage: TaskStorage) -> Self {
        Self {
            tasks: Vec::new(),
            storage,
            ids: Generator::new(),
            synced: true,
        }
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// A corrupt payload resets the collection to empty and is returned as an error for the
    /// caller to report; the store stays usable either way.
    pub fn load(&mut self) -> Result<usize, StorageError> {
        match self.storage.load() {
            Ok(tasks) => {
                self.tasks = retain_valid(tasks);
                self.synced = true;
                Ok(self.tasks.len())
            }
            Err(err) => {
                self.tasks.clear();
                Err(err)
            }
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> Counts {
        Counts::from_tasks(&self.tasks)
    }

    /// Whether the last write reached storage.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn add(&mut self, raw_text: &str) -> Result<Task, StoreError> {
        let text = normalize_text(raw_text)?;
        let task = Task::new(self.next_id(), text, Utc::now());
        self.tasks.insert(0, task.clone());
        debug!(task_id = %task.id, total = self.tasks.len(), "added task");
        self.persist()?;
        Ok(task)
    }

    /// Flip completion. `Ok(None)` when the id is unknown.
    pub fn toggle(&mut self, id: &str) -> Result<Option<bool>, StoreError> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(task_id = id, "toggle ignored, task not found");
            return Ok(None);
        };
        task.completed = !task.completed;
        let completed = task.completed;
        debug!(task_id = id, completed, "toggled task");
        self.persist()?;
        Ok(Some(completed))
    }

    pub fn edit(&mut self, id: &str, raw_text: &str) -> Result<EditOutcome, StoreError> {
        if raw_text.trim().is_empty() {
            return Ok(EditOutcome::Unchanged);
        }
        let Some(index) = self.position(id) else {
            debug!(task_id = id, "edit ignored, task not found");
            return Ok(EditOutcome::Unchanged);
        };
        let text = normalize_text(raw_text)?;
        self.tasks[index].text = text;
        let updated = self.tasks[index].clone();
        debug!(task_id = id, "edited task");
        self.persist()?;
        Ok(EditOutcome::Updated(updated))
    }

    pub fn remove(&mut self, id: &str) -> Result<Option<Task>, StoreError> {
        let Some(index) = self.position(id) else {
            debug!(task_id = id, "remove ignored, task not found");
            return Ok(None);
        };
        let removed = self.tasks.remove(index);
        debug!(task_id = id, total = self.tasks.len(), "removed task");
        self.persist()?;
        Ok(Some(removed))
    }

    /// Drop every completed task and return how many went. Zero skips the write.
    pub fn remove_completed(&mut self) -> Result<usize, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Ok(0);
        }
        debug!(removed, total = self.tasks.len(), "cleared completed tasks");
        self.persist()?;
        Ok(removed)
    }

    pub fn remove_all(&mut self) -> Result<ClearAllOutcome, StoreError> {
        let removed = self.tasks.len();
        if removed == 0 {
            return Ok(ClearAllOutcome { removed });
        }
        self.tasks.clear();
        debug!(removed, "cleared all tasks");
        self.persist()?;
        Ok(ClearAllOutcome { removed })
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn next_id(&mut self) -> String {
        match self.ids.generate() {
            Ok(id) => id.to_string(),
            // Random bits exhausted within one millisecond; a fresh ulid is still unique.
            Err(_) => ulid::Ulid::new().to_string(),
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        match self.storage.save(&self.tasks) {
            Ok(()) => {
                self.synced = true;
                Ok(())
            }
            Err(err) => {
                self.synced = false;
                Err(err)
            }
        }
    }
}

/// Drop entries that break the collection invariants (duplicate ids, blank or over-long
/// text) instead of letting them into memory.
fn retain_valid(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter_map(|mut task| {
            if !seen.insert(task.id.clone()) {
                warn!(task_id = %task.id, "skipping duplicate saved task");
                return None;
            }
            match normalize_text(&task.text) {
                Ok(text) => {
                    task.text = text;
                    Some(task)
                }
                Err(err) => {
                    warn!(task_id = %task.id, error = %err, "skipping invalid saved task");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::model::{Filter, MAX_TEXT_LEN};
    use crate::storage::{MemoryStore, STORAGE_KEY};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn store_with_memory() -> (TaskStore, MemoryStore) {
        let memory = MemoryStore::new();
        let mut store = TaskStore::new(TaskStorage::new(memory.clone()));
        store.load().unwrap();
        (store, memory)
    }

    fn reload(memory: &MemoryStore) -> TaskStore {
        let mut store = TaskStore::new(TaskStorage::new(memory.clone()));
        store.load().unwrap();
        store
    }

    #[rstest]
    #[case("Buy milk")]
    #[case("  padded  ")]
    #[case("x")]
    fn add_inserts_new_task_first(#[case] text: &str) {
        let (mut store, _memory) = store_with_memory();
        store.add("existing").unwrap();
        let before = store.counts().total;

        let task = store.add(text).unwrap();

        assert_eq!(store.counts().total, before + 1);
        assert_eq!(store.tasks()[0], task);
        assert_eq!(task.text, text.trim());
        assert!(!task.completed);
    }

    #[test]
    fn add_accepts_exactly_max_length() {
        let (mut store, _memory) = store_with_memory();
        let text = "a".repeat(MAX_TEXT_LEN);
        assert_eq!(store.add(&text).unwrap().text, text);
    }

    #[rstest]
    #[case("", ValidationError::Empty)]
    #[case("     ", ValidationError::Empty)]
    #[case(&"a".repeat(101), ValidationError::TooLong { len: 101, max: 100 })]
    fn add_rejects_invalid_text(#[case] text: &str, #[case] expected: ValidationError) {
        let (mut store, memory) = store_with_memory();
        store.add("keep me").unwrap();
        let snapshot = store.tasks().to_vec();

        let err = store.add(text).unwrap_err();

        assert!(matches!(err, StoreError::Validation(ref v) if *v == expected));
        assert_eq!(store.tasks(), snapshot.as_slice());
        assert_eq!(reload(&memory).tasks(), snapshot.as_slice());
    }

    #[test]
    fn generated_ids_are_unique() {
        let (mut store, _memory) = store_with_memory();
        for n in 0..200 {
            store.add(&format!("task {n}")).unwrap();
        }
        let ids: HashSet<_> = store.tasks().iter().map(|task| task.id.clone()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn toggle_twice_restores_task() {
        let (mut store, _memory) = store_with_memory();
        let task = store.add("Write report").unwrap();

        assert_eq!(store.toggle(&task.id).unwrap(), Some(true));
        assert_eq!(store.toggle(&task.id).unwrap(), Some(false));

        assert_eq!(store.get(&task.id), Some(&task));
    }

    #[test]
    fn unknown_ids_are_silent_no_ops() {
        let (mut store, _memory) = store_with_memory();
        store.add("Only task").unwrap();
        let snapshot = store.tasks().to_vec();

        assert_eq!(store.toggle("missing").unwrap(), None);
        assert_eq!(store.edit("missing", "new").unwrap(), EditOutcome::Unchanged);
        assert_eq!(store.remove("missing").unwrap(), None);
        assert_eq!(store.tasks(), snapshot.as_slice());
    }

    #[test]
    fn edit_replaces_trimmed_text_and_persists() {
        let (mut store, memory) = store_with_memory();
        let task = store.add("Draft").unwrap();

        let outcome = store.edit(&task.id, "  Final  ").unwrap();

        let EditOutcome::Updated(updated) = outcome else {
            panic!("expected an update");
        };
        assert_eq!(updated.text, "Final");
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(reload(&memory).get(&task.id).unwrap().text, "Final");
    }

    #[test]
    fn edit_with_blank_text_is_a_cancel() {
        let (mut store, _memory) = store_with_memory();
        let task = store.add("Draft").unwrap();
        assert_eq!(store.edit(&task.id, "   ").unwrap(), EditOutcome::Unchanged);
        assert_eq!(store.get(&task.id).unwrap().text, "Draft");
    }

    #[test]
    fn edit_rejects_over_long_text() {
        let (mut store, _memory) = store_with_memory();
        let task = store.add("Draft").unwrap();
        let err = store.edit(&task.id, &"b".repeat(150)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::TooLong { len: 150, .. })
        ));
        assert_eq!(store.get(&task.id).unwrap().text, "Draft");
    }

    #[test]
    fn remove_completed_is_idempotent() {
        let (mut store, _memory) = store_with_memory();
        let a = store.add("A").unwrap();
        store.add("B").unwrap();
        let c = store.add("C").unwrap();
        store.toggle(&a.id).unwrap();
        store.toggle(&c.id).unwrap();

        assert_eq!(store.remove_completed().unwrap(), 2);
        let after_first = store.tasks().to_vec();
        assert_eq!(store.remove_completed().unwrap(), 0);
        assert_eq!(store.tasks(), after_first.as_slice());
    }

    #[test]
    fn add_toggle_clear_completed_scenario() {
        let (mut store, _memory) = store_with_memory();
        let task = store.add("A").unwrap();
        store.toggle(&task.id).unwrap();
        assert_eq!(store.remove_completed().unwrap(), 1);
        assert_eq!(store.counts().total, 0);
    }

    #[test]
    fn remove_all_reports_emptiness() {
        let (mut store, memory) = store_with_memory();
        assert!(store.remove_all().unwrap().was_empty());

        store.add("one").unwrap();
        store.add("two").unwrap();
        let outcome = store.remove_all().unwrap();
        assert_eq!(outcome.removed, 2);
        assert!(reload(&memory).is_empty());
    }

    #[test]
    fn reload_preserves_order_and_fields() {
        let (mut store, memory) = store_with_memory();
        let first = store.add("first").unwrap();
        store.add("second").unwrap();
        store.toggle(&first.id).unwrap();

        assert_eq!(reload(&memory).tasks(), store.tasks());
    }

    #[test]
    fn active_and_completed_partition_the_collection() {
        let (mut store, _memory) = store_with_memory();
        for n in 0..6 {
            let task = store.add(&format!("task {n}")).unwrap();
            if n % 3 == 0 {
                store.toggle(&task.id).unwrap();
            }
        }
        let ids = |filter: Filter| -> HashSet<String> {
            store
                .tasks()
                .iter()
                .filter(|task| filter.matches(task))
                .map(|task| task.id.clone())
                .collect()
        };
        let active = ids(Filter::Active);
        let completed = ids(Filter::Completed);
        assert!(active.is_disjoint(&completed));
        let union: HashSet<_> = active.union(&completed).cloned().collect();
        assert_eq!(union, ids(Filter::All));
    }

    #[test]
    fn corrupt_payload_resets_to_empty_and_store_keeps_working() {
        let memory = MemoryStore::new();
        memory.insert(STORAGE_KEY, "[{\"id\": 1,");
        let mut store = TaskStore::new(TaskStorage::new(memory.clone()));

        let err = store.load().unwrap_err();

        assert!(err.is_corrupt());
        assert!(store.is_empty());
        let task = store.add("fresh start").unwrap();
        assert_eq!(reload(&memory).tasks(), &[task]);
    }

    #[test]
    fn failed_write_keeps_memory_and_retries_next_mutation() {
        let (mut store, memory) = store_with_memory();
        memory.set_fail_writes(true);

        let err = store.add("unsaved").unwrap_err();
        assert!(matches!(err, StoreError::Storage(StorageError::WriteFailed { .. })));
        assert_eq!(store.counts().total, 1);
        assert!(!store.is_synced());

        memory.set_fail_writes(false);
        store.add("saved").unwrap();
        assert!(store.is_synced());
        assert_eq!(reload(&memory).counts().total, 2);
    }

    #[test]
    fn load_skips_entries_that_break_invariants() {
        let memory = MemoryStore::new();
        memory.insert(
            STORAGE_KEY,
            r#"[
                {"id":"a","text":"ok","completed":false,"createdAt":"2024-01-01T00:00:00Z"},
                {"id":"a","text":"dupe","completed":false,"createdAt":"2024-01-01T00:00:00Z"},
                {"id":"b","text":"   ","completed":true,"createdAt":"2024-01-01T00:00:00Z"}
            ]"#,
        );
        let store = reload(&memory);
        assert_eq!(store.counts().total, 1);
        assert_eq!(store.tasks()[0].text, "ok");
    }
}
