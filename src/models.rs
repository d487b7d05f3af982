use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type TaskId = i64;

pub const DEFAULT_STORAGE_KEY: &str = "tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Option<Category>,
    #[serde(default)]
    pub completed: bool,
}

/// Accepts any casing; a name outside [`Category::ALL`] reads as uncategorized instead of
/// failing the whole task.
fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(name) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match name.parse::<Category>() {
        Ok(category) => Ok(Some(category)),
        Err(err) => {
            log::warn!("{err}; treating task as uncategorized");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_category")]
    pub default_category: Option<Category>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            default_category: default_category(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_category() -> Option<Category> {
    // Preselected in the add form.
    Some(Category::Work)
}
