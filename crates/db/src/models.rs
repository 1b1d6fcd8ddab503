//! Data models for simpletodo
//!
//! Plain data holders for tasks and tags. Equality is identity-and-value:
//! two records are equal when both the id and the text field match.

use serde::{Deserialize, Serialize};

/// A to-do item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Caller-chosen identifier, unique within the task table
    pub id: String,
    /// What has to be done
    pub description: String,
}

impl Task {
    /// Create a new task
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }

    /// Whether both id and description carry non-blank text
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty() && !self.description.trim().is_empty()
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.description)
    }
}

/// A label that can be attached to tasks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Caller-chosen identifier, unique within the tag table
    pub id: String,
    /// Display name, unique across tags
    pub name: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Whether both id and name carry non-blank text
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

/// The task/tag pair touched by an assign or unassign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub task: Task,
    pub tag: Tag,
}
