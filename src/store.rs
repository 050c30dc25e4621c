//! In-memory task collection and its persistence.
//!
//! `TaskStore` is the only owner of the task list. Tasks are addressed by
//! position; positions are dense and shift down after a removal, so callers
//! must re-read positions from a fresh render after every mutation.

use thiserror::Error;
use tracing::{debug, info};

use crate::storage::{Storage, StorageError};
use crate::task::{StoredRecord, Task};

/// Errors returned by store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no task at position {index} (collection has {len})")]
    OutOfBounds { index: usize, len: usize },
    /// The mutation was applied in memory but could not be saved.
    #[error("change kept in memory but not saved: {0}")]
    Persist(#[from] StorageError),
}

/// Ordered task collection persisted through a `Storage` backend.
#[derive(Debug)]
pub struct TaskStore<S: Storage> {
    tasks: Vec<Task>,
    storage: S,
}

impl<S: Storage> TaskStore<S> {
    /// Create an empty store. Call `load_all` to read persisted tasks.
    pub fn new(storage: S) -> Self {
        TaskStore {
            tasks: Vec::new(),
            storage,
        }
    }

    /// Create a store and load the persisted collection.
    pub fn open(storage: S) -> Self {
        let mut store = TaskStore::new(storage);
        store.load_all();
        store
    }

    /// Replace the in-memory collection with the stored one.
    pub fn load_all(&mut self) {
        self.tasks = self
            .storage
            .load()
            .into_iter()
            .map(Task::from_record)
            .collect();
        info!(count = self.tasks.len(), "task store loaded");
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Add a task at the end and return its position.
    pub fn append(&mut self, task: Task) -> Result<usize, StoreError> {
        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        debug!(index, "task appended");
        self.persist()?;
        Ok(index)
    }

    /// Replace the task at `index`.
    pub fn replace_at(&mut self, index: usize, task: Task) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.tasks[index] = task;
        debug!(index, "task replaced");
        self.persist()
    }

    /// Remove the task at `index`, shifting later tasks down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Task, StoreError> {
        self.check_index(index)?;
        let removed = self.tasks.remove(index);
        debug!(index, "task removed");
        self.persist()?;
        Ok(removed)
    }

    /// Save the current collection. Mutations call this; it can also be
    /// called again after a failed save.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let records: Vec<StoredRecord> = self.tasks.iter().map(Task::to_record).collect();
        self.storage.save(&records)?;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(StoreError::OutOfBounds { index, len: self.tasks.len() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::{LocalStorage, LocalStorageAdapter, STORAGE_KEY};

    fn task(title: &str, progress: i64) -> Task {
        Task::new(title, "2026-11-01", Priority::Medium, progress, "")
    }

    fn saved_titles(store: &TaskStore<MemoryStorage>) -> Vec<String> {
        store
            .storage()
            .saved
            .as_ref()
            .unwrap()
            .iter()
            .map(|r| r.title.clone())
            .collect()
    }

    #[test]
    fn test_append_returns_positions() {
        let mut store = TaskStore::new(MemoryStorage::default());
        assert_eq!(store.append(task("A", 0)).unwrap(), 0);
        assert_eq!(store.append(task("B", 0)).unwrap(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().title(), "B");
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut store = TaskStore::new(MemoryStorage::default());
        store.append(task("A", 0)).unwrap();
        store.append(task("B", 0)).unwrap();
        let removed = store.remove_at(0).unwrap();
        assert_eq!(removed.title(), "A");
        assert_eq!(store.tasks(), &[task("B", 0)]);
    }

    #[test]
    fn test_replace_does_not_append() {
        let mut store = TaskStore::new(MemoryStorage::default());
        store.append(task("A", 0)).unwrap();
        store.replace_at(0, task("B", 50)).unwrap();
        assert_eq!(store.tasks(), &[task("B", 50)]);
    }

    #[test]
    fn test_every_mutation_saves_once() {
        let mut store = TaskStore::new(MemoryStorage::default());
        store.append(task("A", 0)).unwrap();
        assert_eq!(store.storage().save_calls, 1);
        assert_eq!(saved_titles(&store), vec!["A"]);

        store.append(task("B", 0)).unwrap();
        assert_eq!(store.storage().save_calls, 2);
        assert_eq!(saved_titles(&store), vec!["A", "B"]);

        store.replace_at(1, task("C", 0)).unwrap();
        assert_eq!(store.storage().save_calls, 3);
        assert_eq!(saved_titles(&store), vec!["A", "C"]);

        store.remove_at(0).unwrap();
        assert_eq!(store.storage().save_calls, 4);
        assert_eq!(saved_titles(&store), vec!["C"]);
    }

    #[test]
    fn test_out_of_bounds_is_rejected_without_saving() {
        let mut store = TaskStore::new(MemoryStorage::default());
        store.append(task("A", 0)).unwrap();

        let err = store.replace_at(1, task("B", 0)).unwrap_err();
        assert!(matches!(err, StoreError::OutOfBounds { index: 1, len: 1 }));
        let err = store.remove_at(5).unwrap_err();
        assert!(matches!(err, StoreError::OutOfBounds { index: 5, len: 1 }));

        assert_eq!(store.tasks(), &[task("A", 0)]);
        assert_eq!(store.storage().save_calls, 1);
    }

    #[test]
    fn test_failed_save_keeps_memory_and_can_retry() {
        let mut store = TaskStore::new(MemoryStorage::default());
        store.append(task("A", 0)).unwrap();

        store.storage.fail_saves = true;
        let err = store.append(task("B", 0)).unwrap_err();
        assert!(matches!(err, StoreError::Persist(_)));
        assert_eq!(store.len(), 2);
        assert_eq!(saved_titles(&store), vec!["A"]);

        store.storage.fail_saves = false;
        store.persist().unwrap();
        assert_eq!(saved_titles(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_reload_reproduces_collection() {
        let dir = tempfile::tempdir().unwrap();
        let open = || {
            TaskStore::open(LocalStorageAdapter::new(
                LocalStorage::open(dir.path()).unwrap(),
                STORAGE_KEY,
            ))
        };

        let mut store = open();
        assert!(store.is_empty());
        store.append(task("A", 20)).unwrap();
        store.append(Task::new("B", "", Priority::Other("Later".into()), 60, "n")).unwrap();
        store.append(task("C", 100)).unwrap();
        let before = store.tasks().to_vec();

        store.load_all();
        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(open().tasks(), before.as_slice());
    }
}
