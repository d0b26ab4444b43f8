//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! pure data with no I/O.

/// SQL statement to create all tables.
///
/// `tasks.project_id` is a plain indexed column rather than an enforced
/// foreign key: referential existence is checked at validation time, and
/// deleting a project must not rewrite task rows behind the cache.
pub const CREATE_TABLES: &str = r#"
-- Projects table
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Tasks table
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    project_id TEXT,
    title TEXT NOT NULL,
    description TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id);
CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
CREATE INDEX IF NOT EXISTS idx_projects_created_at ON projects(created_at);
"#;

// Task queries
pub const INSERT_TASK: &str = r#"
INSERT INTO tasks (id, project_id, title, description, completed, due_date, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_TASK_BY_ID: &str = r#"
SELECT id, project_id, title, description, completed, due_date, created_at, updated_at
FROM tasks
WHERE id = ?1
"#;

pub const SELECT_ALL_TASKS: &str = r#"
SELECT id, project_id, title, description, completed, due_date, created_at, updated_at
FROM tasks
ORDER BY created_at, id
"#;

pub const UPDATE_TASK: &str = r#"
UPDATE tasks
SET project_id = ?2, title = ?3, description = ?4, completed = ?5, due_date = ?6, updated_at = ?7
WHERE id = ?1
"#;

pub const DELETE_TASK: &str = r#"
DELETE FROM tasks
WHERE id = ?1
"#;

// Project queries
pub const INSERT_PROJECT: &str = r#"
INSERT INTO projects (id, name, description, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_PROJECT_BY_ID: &str = r#"
SELECT id, name, description, created_at, updated_at
FROM projects
WHERE id = ?1
"#;

pub const SELECT_ALL_PROJECTS: &str = r#"
SELECT id, name, description, created_at, updated_at
FROM projects
ORDER BY created_at, id
"#;

pub const UPDATE_PROJECT: &str = r#"
UPDATE projects
SET name = ?2, description = ?3, updated_at = ?4
WHERE id = ?1
"#;

pub const DELETE_PROJECT: &str = r#"
DELETE FROM projects
WHERE id = ?1
"#;
