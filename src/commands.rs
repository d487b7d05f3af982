//! Calls made by the presentation layer. Every command reports through [`CommandResult`] so a UI
//! bridge can forward results without matching on Rust error types.

use crate::models::{Category, Task, TaskId};
use crate::query::{filter_tasks, CategoryFilter};
use crate::share::{format_collection, format_task, ShareOutcome, ShareTarget};
use crate::state::SharedStore;
use crate::storage::KeyValueStore;

#[derive(Debug, serde::Serialize)]
pub struct CommandResult<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Host services a command may need besides the store.
pub trait CommandCtx: ShareTarget {
    /// Shows a user-visible alert.
    fn alert(&self, message: &str);
}

fn ok<T>(data: T) -> CommandResult<T> {
    CommandResult {
        ok: true,
        data: Some(data),
        error: None,
    }
}

fn err<T>(message: &str) -> CommandResult<T> {
    CommandResult {
        ok: false,
        data: None,
        error: Some(message.to_string()),
    }
}

pub fn load_tasks<S: KeyValueStore>(store: &SharedStore<S>) -> CommandResult<Vec<Task>> {
    match store.load() {
        Ok(tasks) => ok(tasks),
        Err(error) => err(&format!("storage error: {error}")),
    }
}

/// `data` is `None` when the title was blank and nothing was added.
pub fn add_task<S: KeyValueStore>(
    store: &SharedStore<S>,
    title: &str,
    category: Option<Category>,
) -> CommandResult<Option<Task>> {
    match store.add(title, category) {
        Ok(task) => ok(task),
        Err(error) => err(&format!("storage error: {error}")),
    }
}

pub fn toggle_task<S: KeyValueStore>(
    store: &SharedStore<S>,
    id: TaskId,
) -> CommandResult<Vec<Task>> {
    match store.toggle_complete(id) {
        Ok(tasks) => ok(tasks),
        Err(error) => err(&format!("storage error: {error}")),
    }
}

pub fn delete_task<S: KeyValueStore>(
    store: &SharedStore<S>,
    id: TaskId,
) -> CommandResult<Vec<Task>> {
    match store.delete(id) {
        Ok(tasks) => ok(tasks),
        Err(error) => err(&format!("storage error: {error}")),
    }
}

/// Filters the last loaded collection; never touches storage.
pub fn visible_tasks<S: KeyValueStore>(
    store: &SharedStore<S>,
    category: CategoryFilter,
    search: &str,
) -> CommandResult<Vec<Task>> {
    ok(filter_tasks(&store.tasks(), category, search))
}

/// `data` is `true` only when the share sheet reports the message as sent.
pub fn share_task<S: KeyValueStore>(
    ctx: &impl CommandCtx,
    store: &SharedStore<S>,
    id: TaskId,
) -> CommandResult<bool> {
    let Some(task) = store.find(id) else {
        return err("task not found");
    };
    ok(present_share_sheet(ctx, &format_task(&task)))
}

pub fn share_all_tasks<S: KeyValueStore>(
    ctx: &impl CommandCtx,
    store: &SharedStore<S>,
) -> CommandResult<bool> {
    match format_collection(&store.tasks()) {
        Ok(message) => ok(present_share_sheet(ctx, &message)),
        Err(error) => {
            let message = error.to_string();
            ctx.alert(&message);
            err(&message)
        }
    }
}

fn present_share_sheet(ctx: &impl CommandCtx, message: &str) -> bool {
    match ctx.share(message) {
        Ok(ShareOutcome::Shared) => true,
        Ok(ShareOutcome::Dismissed) => {
            log::debug!("share dismissed");
            false
        }
        Err(error) => {
            log::warn!("error sharing: {error}");
            false
        }
    }
}
