use std::fmt;
use std::str::FromStr;

use crate::models::{Category, Task, UnknownCategory};

/// Category selector for the task list: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Selector options in display order.
    pub fn options() -> impl Iterator<Item = CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => task.category == Some(category),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => fmt::Display::fmt(category, f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        value.parse().map(CategoryFilter::Only)
    }
}

/// Tasks in `category` whose title contains `search`, ignoring case. Input order is kept.
pub fn filter_tasks(tasks: &[Task], category: CategoryFilter, search: &str) -> Vec<Task> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|task| category.matches(task) && task.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
