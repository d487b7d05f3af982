use chrono::Utc;

use crate::models::{Category, Task, TaskId, DEFAULT_STORAGE_KEY};
use crate::storage::{KeyValueStore, StorageError};

/// Owns the task collection and mediates every read and write of it.
///
/// Each mutation reads the persisted collection, applies the change and writes the whole
/// collection back before returning. The in-memory copy only advances after a successful write.
pub struct TaskStore<S> {
    backend: S,
    key: String,
    tasks: Vec<Task>,
    clock: fn() -> TaskId,
}

fn now_millis() -> TaskId {
    Utc::now().timestamp_millis()
}

/// Creation time in milliseconds, bumped past the newest id so ids stay unique and increasing.
/// `None` once the newest id is `TaskId::MAX`.
fn next_id(tasks: &[Task], now: TaskId) -> Option<TaskId> {
    match tasks.iter().map(|task| task.id).max() {
        Some(latest) if latest >= now => latest.checked_add(1),
        _ => Some(now),
    }
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            tasks: Vec::new(),
            clock: now_millis,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> TaskId) -> Self {
        self.clock = clock;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last loaded or persisted collection.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Missing and malformed data both load as an empty list; only backend failures are errors.
    pub fn load(&mut self) -> Result<Vec<Task>, StorageError> {
        let tasks = self.read()?;
        self.tasks = tasks.clone();
        Ok(tasks)
    }

    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let json = serde_json::to_string(tasks)?;
        self.backend.set(&self.key, &json)?;
        self.tasks = tasks.to_vec();
        Ok(())
    }

    /// Returns `Ok(None)` without touching storage when the trimmed title is empty.
    pub fn add(
        &mut self,
        title: &str,
        category: Option<Category>,
    ) -> Result<Option<Task>, StorageError> {
        let title = title.trim();
        if title.is_empty() {
            log::debug!("add ignored: empty title");
            return Ok(None);
        }

        let mut tasks = self.read()?;
        let id = next_id(&tasks, (self.clock)())
            .ok_or_else(|| StorageError::Unavailable("task id space exhausted".to_string()))?;
        let task = Task {
            id,
            title: title.to_string(),
            category,
            completed: false,
        };
        tasks.push(task.clone());
        self.save(&tasks)?;

        log::info!(
            "task added id={} category={}",
            task.id,
            task.category.map(Category::as_str).unwrap_or("none")
        );
        Ok(Some(task))
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Vec<Task>, StorageError> {
        self.modify("toggle_complete", id, |tasks| {
            match tasks.iter_mut().find(|task| task.id == id) {
                Some(task) => {
                    task.completed = !task.completed;
                    true
                }
                None => false,
            }
        })
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Vec<Task>, StorageError> {
        self.modify("delete", id, |tasks| {
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            tasks.len() != before
        })
    }

    fn modify(
        &mut self,
        op: &str,
        id: TaskId,
        apply: impl FnOnce(&mut Vec<Task>) -> bool,
    ) -> Result<Vec<Task>, StorageError> {
        let mut tasks = self.read()?;
        if apply(&mut tasks) {
            log::info!("{op} applied id={id}");
        } else {
            log::debug!("{op}: no task with id={id}");
        }
        self.save(&tasks)?;
        Ok(tasks)
    }

    fn read(&self) -> Result<Vec<Task>, StorageError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            log::debug!("no persisted tasks under key={}", self.key);
            return Ok(Vec::new());
        };
        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                log::warn!(
                    "discarding unreadable task data key={} error={err}; \
                     it will be replaced on the next write",
                    self.key
                );
                return Ok(Vec::new());
            }
        };

        // One bad record should not cost the rest of the list.
        let mut tasks = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Task>(record) {
                Ok(task) => tasks.push(task),
                Err(err) => log::warn!(
                    "skipping unreadable task record key={} index={index} error={err}; \
                     it will be dropped on the next write",
                    self.key
                ),
            }
        }
        Ok(tasks)
    }
}
