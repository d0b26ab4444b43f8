//! Request payloads for creating and replacing resources.
//!
//! PUT is a full replacement, so create and update share one payload shape
//! per kind. Validation is a pure pass over the fields; referential checks
//! (does the referenced project exist?) stay with the caller, which has
//! store access.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::error::ValidationError;
use super::types::{Project, Task};
use super::validation::{check_max_len, check_required};

/// Maximum length for task titles and project names.
pub const TITLE_MAX_LEN: usize = 200;
/// Maximum length for descriptions.
pub const DESCRIPTION_MAX_LEN: usize = 2000;

/// Payload for creating or fully replacing a task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub project_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl TaskInput {
    /// Validates the payload fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        errors.extend(check_required("title", &self.title));
        errors.extend(check_max_len("title", &self.title, TITLE_MAX_LEN));
        if let Some(description) = &self.description {
            errors.extend(check_max_len(
                "description",
                description,
                DESCRIPTION_MAX_LEN,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(errors))
        }
    }

    /// Converts the payload into a new task with a fresh id and timestamps.
    pub fn into_task(self) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            due_date: self.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field of `task`, bumping `updated_at`.
    ///
    /// The id and `created_at` are preserved.
    pub fn apply_to(self, task: &mut Task) {
        task.project_id = self.project_id;
        task.title = self.title;
        task.description = self.description;
        task.completed = self.completed;
        task.due_date = self.due_date;
        task.updated_at = Utc::now();
    }
}

/// Payload for creating or fully replacing a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectInput {
    /// Validates the payload fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        errors.extend(check_required("name", &self.name));
        errors.extend(check_max_len("name", &self.name, TITLE_MAX_LEN));
        if let Some(description) = &self.description {
            errors.extend(check_max_len(
                "description",
                description,
                DESCRIPTION_MAX_LEN,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(errors))
        }
    }

    /// Converts the payload into a new project with a fresh id and timestamps.
    pub fn into_project(self) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field of `project`, bumping `updated_at`.
    pub fn apply_to(self, project: &mut Project) {
        project.name = self.name;
        project.description = self.description;
        project.updated_at = Utc::now();
    }
}
