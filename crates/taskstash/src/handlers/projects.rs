//! Project CRUD handlers.
//!
//! Same shape as the task handlers; the cache-aside behavior lives in the
//! repository decorator.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use taskstash_core::resource::{Project, ProjectInput};
use taskstash_core::storage::RepositoryError;

use crate::{auth::CurrentCaller, handlers::AppError, state::AppState};

/// List all projects (GET /project/).
pub async fn list_projects(
    _caller: CurrentCaller,
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.projects.list().await?;
    Ok(Json(projects))
}

/// Create a new project (POST /project/).
pub async fn create_project(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let Json(input) = payload?;
    tracing::debug!(payload = ?input, "Received create project request");

    input.validate()?;

    let project = input.into_project();

    // Create via the repository (which handles cache invalidation)
    state.projects.create(&project).await?;

    tracing::info!(project_id = %project.id, name = %project.name, "Created new project");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a single project by ID (GET /project/{id}/).
pub async fn get_project(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    match state.projects.get(id).await? {
        Some(project) => Ok(Json(project)),
        None => Err(RepositoryError::NotFound {
            entity_type: "Project",
            id: id.to_string(),
        }
        .into()),
    }
}

/// Fully replace a project by ID (PUT /project/{id}/).
pub async fn update_project(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> Result<Json<Project>, AppError> {
    let mut project = state
        .projects
        .get(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Project",
            id: id.to_string(),
        })?;

    let Json(input) = payload?;
    tracing::debug!(project_id = %id, payload = ?input, "Received update project request");

    input.validate()?;
    input.apply_to(&mut project);

    // Update via the repository (which handles cache invalidation)
    state.projects.update(&project).await?;

    tracing::info!(project_id = %id, "Updated project");

    Ok(Json(project))
}

/// Delete a project by ID (DELETE /project/{id}/).
///
/// Tasks referencing the project keep their `project_id`; the reference
/// simply dangles. The resources are flat and independently keyed.
pub async fn delete_project(
    _caller: CurrentCaller,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tracing::debug!(project_id = %id, "Received delete project request");

    // Delete via the repository (which handles cache invalidation)
    state.projects.delete(id).await?;

    tracing::info!(project_id = %id, "Deleted project");

    Ok(StatusCode::NO_CONTENT)
}
