use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::{Category, Task, TaskId};
use crate::storage::{KeyValueStore, StorageError};
use crate::store::TaskStore;

/// Cloneable handle to one [`TaskStore`]. The lock is held for a whole read-modify-write cycle,
/// so concurrent writers never interleave.
pub struct SharedStore<S> {
    inner: Arc<Mutex<TaskStore<S>>>,
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedStore<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    // A panic mid-operation cannot leave partial state: memory only changes after a write.
    fn lock(&self) -> MutexGuard<'_, TaskStore<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks().to_vec()
    }

    pub fn find(&self, id: TaskId) -> Option<Task> {
        self.lock().tasks().iter().find(|task| task.id == id).cloned()
    }

    pub fn load(&self) -> Result<Vec<Task>, StorageError> {
        self.lock().load()
    }

    pub fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.lock().save(tasks)
    }

    pub fn add(
        &self,
        title: &str,
        category: Option<Category>,
    ) -> Result<Option<Task>, StorageError> {
        self.lock().add(title, category)
    }

    pub fn toggle_complete(&self, id: TaskId) -> Result<Vec<Task>, StorageError> {
        self.lock().toggle_complete(id)
    }

    pub fn delete(&self, id: TaskId) -> Result<Vec<Task>, StorageError> {
        self.lock().delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::thread;

    fn make_state() -> SharedStore<MemoryStore> {
        SharedStore::new(TaskStore::new(MemoryStore::new()))
    }

    #[test]
    fn clones_share_one_collection() {
        let state = make_state();
        let other = state.clone();
        let task = state.add("a", Some(Category::Work)).unwrap().unwrap();
        assert_eq!(other.tasks(), vec![task.clone()]);
        assert_eq!(other.find(task.id), Some(task.clone()));
        assert_eq!(other.find(task.id + 1), None);

        other.toggle_complete(task.id).unwrap();
        assert!(state.tasks()[0].completed);

        state.delete(task.id).unwrap();
        assert!(other.tasks().is_empty());
    }

    #[test]
    fn save_and_load_go_through_the_handle() {
        let state = make_state();
        let tasks = vec![Task {
            id: 9,
            title: "x".to_string(),
            category: None,
            completed: true,
        }];
        state.save(&tasks).unwrap();
        assert_eq!(state.load().unwrap(), tasks);
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let state = make_state();
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let state = state.clone();
                thread::spawn(move || {
                    for n in 0..10 {
                        state.add(&format!("w{worker}-{n}"), None).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let tasks = state.load().unwrap();
        assert_eq!(tasks.len(), 80);
        let mut ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 80);
    }
}
