use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a todo, assigned once at creation.
pub type TodoId = u64;

/// Lifecycle of a todo. Only moves forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    /// Human readable label used by the pages.
    pub fn label(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "Pending",
            TodoStatus::InProgress => "In Progress",
            TodoStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TodoStatus::Pending => "PENDING",
            TodoStatus::InProgress => "IN_PROGRESS",
            TodoStatus::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    #[error("Invalid todo: {0}")]
    InvalidEntity(String),
    #[error("Cannot transition from \"{from}\" to \"{to}\".")]
    InvalidStatusTransition { from: TodoStatus, to: TodoStatus },
}

/// Everything needed to build a [`Todo`].
#[derive(Debug, Clone)]
pub struct TodoProps {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single task on the list.
///
/// Title and description are never blank. Every mutation refreshes
/// `updated_at`; a failed mutation leaves the todo untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: String,
    description: String,
    status: TodoStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Builds a todo, rejecting blank title or description.
    pub fn new(props: TodoProps) -> Result<Self, TodoError> {
        validate_text("title", &props.title)?;
        validate_text("description", &props.description)?;

        Ok(Todo {
            id: props.id,
            title: props.title,
            description: props.description,
            status: props.status,
            created_at: props.created_at,
            updated_at: props.updated_at,
        })
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TodoStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), TodoError> {
        let title = title.into();
        validate_text("title", &title)?;
        self.title = title;
        self.touch();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), TodoError> {
        let description = description.into();
        validate_text("description", &description)?;
        self.description = description;
        self.touch();
        Ok(())
    }

    /// Moves a pending todo into progress.
    pub fn start(&mut self) -> Result<(), TodoError> {
        self.transition(TodoStatus::Pending, TodoStatus::InProgress)
    }

    /// Completes a todo that is in progress. Pending todos must be started first.
    pub fn complete(&mut self) -> Result<(), TodoError> {
        self.transition(TodoStatus::InProgress, TodoStatus::Completed)
    }

    fn transition(&mut self, required: TodoStatus, to: TodoStatus) -> Result<(), TodoError> {
        if self.status != required {
            return Err(TodoError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_text(field: &str, value: &str) -> Result<(), TodoError> {
    if value.trim().is_empty() {
        return Err(TodoError::InvalidEntity(format!("{field} must not be empty")));
    }
    Ok(())
}
