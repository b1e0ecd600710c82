use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier. The client never mints one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TodoId(pub String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    /// Builds a pending todo from raw input, or `None` when the trimmed text is empty.
    pub fn from_draft(draft: &str) -> Option<Self> {
        clean_title(draft).map(|title| Self { title, completed: false })
    }
}

/// Body of `PATCH /todos/{id}`. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self { Self { title: Some(title.into()), completed: None } }

    pub fn completed(completed: bool) -> Self { Self { title: None, completed: Some(completed) } }
}

/// Acknowledgment returned by `DELETE /todos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub id: TodoId,
}

/// Which slice of the list the view asks the server for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Active,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Active];

    /// `completed` query value, `None` for the unfiltered list.
    pub fn completed(self) -> Option<bool> {
        match self {
            Filter::All => None,
            Filter::Completed => Some(true),
            Filter::Active => Some(false),
        }
    }

    pub fn path(self) -> String {
        match self.completed() {
            None => "/todos".to_string(),
            Some(completed) => format!("/todos?completed={completed}"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Completed => "Completed",
            Filter::Active => "Active",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Active,
            Filter::Active => Filter::All,
        }
    }
}

pub fn todo_path(id: &TodoId) -> String { format!("/todos/{id}") }

/// Trims a title, rejecting blank input.
pub fn clean_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
