//! Suspending facade over [`SharedStore`].
//!
//! Storage round-trips run on tokio's blocking pool so an async caller (an event loop, a UI
//! bridge) is never blocked on disk I/O. The shared handle's lock still serializes each
//! read-modify-write cycle.

use crate::models::{Category, Task, TaskId};
use crate::state::SharedStore;
use crate::storage::{KeyValueStore, StorageError};

pub struct AsyncTaskStore<S> {
    shared: SharedStore<S>,
}

impl<S> Clone for AsyncTaskStore<S> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<S> AsyncTaskStore<S>
where
    S: KeyValueStore + Send + 'static,
{
    pub fn new(shared: SharedStore<S>) -> Self {
        Self { shared }
    }

    pub fn shared(&self) -> &SharedStore<S> {
        &self.shared
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.shared.tasks()
    }

    pub async fn load(&self) -> Result<Vec<Task>, StorageError> {
        self.run(|store| store.load()).await
    }

    pub async fn save(&self, tasks: Vec<Task>) -> Result<(), StorageError> {
        self.run(move |store| store.save(&tasks)).await
    }

    pub async fn add(
        &self,
        title: String,
        category: Option<Category>,
    ) -> Result<Option<Task>, StorageError> {
        self.run(move |store| store.add(&title, category)).await
    }

    pub async fn toggle_complete(&self, id: TaskId) -> Result<Vec<Task>, StorageError> {
        self.run(move |store| store.toggle_complete(id)).await
    }

    pub async fn delete(&self, id: TaskId) -> Result<Vec<Task>, StorageError> {
        self.run(move |store| store.delete(id)).await
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&SharedStore<S>) -> Result<T, StorageError> + Send + 'static,
    {
        let shared = self.shared.clone();
        tokio::task::spawn_blocking(move || op(&shared))
            .await
            .map_err(|e| StorageError::Unavailable(format!("task join error: {e}")))?
    }
}
