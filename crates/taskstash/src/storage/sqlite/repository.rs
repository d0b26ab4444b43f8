//! SQLite repository implementation.
//!
//! Implements the generic `Repository<T>` trait from
//! `taskstash_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use taskstash_core::resource::{Project, Task};
use taskstash_core::storage::{Repository, RepositoryError, Result};

use super::conversions::{format_date, format_datetime, row_to_project, row_to_task};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for both resource kinds.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// Repository<Task> implementation
// ============================================================================

#[async_trait]
impl Repository<Task> for SqliteRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_TASK_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_task) {
                    Ok(task) => Ok(Some(task)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Task", id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Task>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_TASKS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_task).map_err(wrap_err)?;

                let mut tasks = Vec::new();
                for row_result in rows {
                    tasks.push(row_result.map_err(wrap_err)?);
                }
                Ok(tasks)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create(&self, task: &Task) -> Result<()> {
        let id = task.id.to_string();
        let project_id = task.project_id.map(|p| p.to_string());
        let title = task.title.clone();
        let description = task.description.clone();
        let completed = task.completed;
        let due_date = task.due_date.as_ref().map(format_date);
        let created_at = format_datetime(&task.created_at);
        let updated_at = format_datetime(&task.updated_at);
        let task_id = task.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TASK,
                    rusqlite::params![
                        id,
                        project_id,
                        title,
                        description,
                        completed,
                        due_date,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Task", task_id))
    }

    async fn update(&self, task: &Task) -> Result<()> {
        let id = task.id.to_string();
        let project_id = task.project_id.map(|p| p.to_string());
        let title = task.title.clone();
        let description = task.description.clone();
        let completed = task.completed;
        let due_date = task.due_date.as_ref().map(format_date);
        let updated_at = format_datetime(&task.updated_at);
        let task_id = task.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_TASK,
                        rusqlite::params![
                            id,
                            project_id,
                            title,
                            description,
                            completed,
                            due_date,
                            updated_at
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Task", task_id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let task_id = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_TASK, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Task", task_id))
    }
}

// ============================================================================
// Repository<Project> implementation
// ============================================================================

#[async_trait]
impl Repository<Project> for SqliteRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PROJECT_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_project) {
                    Ok(project) => Ok(Some(project)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Project", id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Project>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ALL_PROJECTS)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_project).map_err(wrap_err)?;

                let mut projects = Vec::new();
                for row_result in rows {
                    projects.push(row_result.map_err(wrap_err)?);
                }
                Ok(projects)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create(&self, project: &Project) -> Result<()> {
        let id = project.id.to_string();
        let name = project.name.clone();
        let description = project.description.clone();
        let created_at = format_datetime(&project.created_at);
        let updated_at = format_datetime(&project.updated_at);
        let project_id = project.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PROJECT,
                    rusqlite::params![id, name, description, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Project", project_id))
    }

    async fn update(&self, project: &Project) -> Result<()> {
        let id = project.id.to_string();
        let name = project.name.clone();
        let description = project.description.clone();
        let updated_at = format_datetime(&project.updated_at);
        let project_id = project.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_PROJECT,
                        rusqlite::params![id, name, description, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Project", project_id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let project_id = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_PROJECT, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Project", project_id))
    }
}
