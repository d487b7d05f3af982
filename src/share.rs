use std::fmt::Write as _;

use crate::models::{Category, Task};

pub const NO_CATEGORY: &str = "No Category";

const LIST_HEADER: &str = "📋 **My To-Do List:**";
const PENDING_HEADER: &str = "⏳ **Pending Tasks:**";
const COMPLETED_HEADER: &str = "✅ **Completed Tasks:**";
const PENDING_LABEL: &str = "⏳ Pending";
const COMPLETED_LABEL: &str = "✅ Completed";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    #[error("No tasks to share!")]
    EmptyCollection,
    #[error("share sheet unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareOutcome {
    Shared,
    Dismissed,
}

/// An external share sheet accepting a plain-text payload.
pub trait ShareTarget {
    fn share(&self, message: &str) -> Result<ShareOutcome, ShareError>;
}

fn category_label(category: Option<Category>) -> &'static str {
    category.map(Category::as_str).unwrap_or(NO_CATEGORY)
}

pub fn format_task(task: &Task) -> String {
    let status = if task.completed {
        COMPLETED_LABEL
    } else {
        PENDING_LABEL
    };
    format!(
        "📝 Task: {}\n📌 Category: {}\n{status}",
        task.title,
        category_label(task.category)
    )
}

/// Pending tasks first, then completed ones, each numbered from 1 in collection order.
pub fn format_collection(tasks: &[Task]) -> Result<String, ShareError> {
    if tasks.is_empty() {
        return Err(ShareError::EmptyCollection);
    }

    let (completed, pending): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|task| task.completed);

    let mut message = format!("{LIST_HEADER}\n\n");
    if !pending.is_empty() {
        push_section(&mut message, PENDING_HEADER, &pending);
        message.push('\n');
    }
    if !completed.is_empty() {
        push_section(&mut message, COMPLETED_HEADER, &completed);
    }
    Ok(message)
}

fn push_section(message: &mut String, header: &str, tasks: &[&Task]) {
    message.push_str(header);
    message.push('\n');
    for (index, task) in tasks.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = writeln!(
            message,
            "{}. {} ({})",
            index + 1,
            task.title,
            category_label(task.category)
        );
    }
}
