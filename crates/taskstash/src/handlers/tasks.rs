//! Task CRUD handlers.
//!
//! These handlers use the repository trait object for storage access.
//! Cache population and invalidation are handled by the cached repository
//! decorator, so nothing here touches the cache directly.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use taskstash_core::resource::{Task, TaskInput, ValidationError};
use taskstash_core::storage::RepositoryError;

use crate::{auth::CurrentCaller, handlers::AppError, state::AppState};

/// List all tasks (GET /task/).
pub async fn list_tasks(
    _caller: CurrentCaller,
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.tasks.list().await?;
    Ok(Json(tasks))
}

/// Create a new task (POST /task/).
pub async fn create_task(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let Json(input) = payload?;
    tracing::debug!(payload = ?input, "Received create task request");

    input.validate()?;
    check_project_reference(&state, input.project_id).await?;

    let task = input.into_task();

    // Create via the repository (which handles cache invalidation)
    state.tasks.create(&task).await?;

    tracing::info!(task_id = %task.id, title = %task.title, "Created new task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a single task by ID (GET /task/{id}/).
pub async fn get_task(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    match state.tasks.get(id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(RepositoryError::NotFound {
            entity_type: "Task",
            id: id.to_string(),
        }
        .into()),
    }
}

/// Fully replace a task by ID (PUT /task/{id}/).
///
/// Unknown ids fail with 404 before the payload is examined, matching the
/// lookup-then-validate order of the API contract.
pub async fn update_task(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let mut task = state
        .tasks
        .get(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Task",
            id: id.to_string(),
        })?;

    let Json(input) = payload?;
    tracing::debug!(task_id = %id, payload = ?input, "Received update task request");

    input.validate()?;
    check_project_reference(&state, input.project_id).await?;

    input.apply_to(&mut task);

    // Update via the repository (which handles cache invalidation)
    state.tasks.update(&task).await?;

    tracing::info!(task_id = %id, "Updated task");

    Ok(Json(task))
}

/// Delete a task by ID (DELETE /task/{id}/).
pub async fn delete_task(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tracing::debug!(task_id = %id, "Received delete task request");

    // Delete via the repository (which handles cache invalidation)
    state.tasks.delete(id).await?;

    tracing::info!(task_id = %id, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}

/// Rejects payloads that reference a project that does not exist.
async fn check_project_reference(
    state: &AppState,
    project_id: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(project_id) = project_id {
        let project = state.projects.get(project_id).await?;
        if project.is_none() {
            return Err(ValidationError::field(
                "project_id",
                format!("Project {project_id} does not exist."),
            )
            .into());
        }
    }
    Ok(())
}
