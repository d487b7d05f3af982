pub mod async_store;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod query;
pub mod share;
pub mod state;
pub mod storage;
pub mod store;

use std::path::Path;

pub use crate::async_store::AsyncTaskStore;
pub use crate::models::{Category, Settings, Task, TaskId};
pub use crate::query::{filter_tasks, CategoryFilter};
pub use crate::share::{format_collection, format_task, ShareError, ShareOutcome, ShareTarget};
pub use crate::state::SharedStore;
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use crate::store::TaskStore;

/// Opens the file-backed store under `data_dir` and loads its tasks.
///
/// Returns the handle together with the settings read from the same directory.
pub fn open(data_dir: &Path) -> Result<(SharedStore<FileStore>, Settings), StorageError> {
    let backend = FileStore::new(data_dir.to_path_buf());
    backend.ensure_dirs()?;
    let settings = config::load_settings(&backend);

    let store = SharedStore::new(TaskStore::with_key(backend, settings.storage_key.clone()));
    let tasks = store.load()?;
    log::debug!(
        "opened store dir={} key={} tasks={}",
        data_dir.display(),
        settings.storage_key,
        tasks.len()
    );
    Ok((store, settings))
}
