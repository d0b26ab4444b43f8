//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use taskstash_core::resource::{Project, Task};
use taskstash_core::storage::{Repository, RepositoryError, Result};

/// In-memory storage backend for testing and single-process deployments.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
/// Lists are returned in insertion order (`created_at`, then id).
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Task> for InMemoryRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by_key(|t| (t.created_at, t.id));
        Ok(all)
    }

    async fn create(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Task",
                id: task.id.to_string(),
            });
        }
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(&task.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Task",
                id: task.id.to_string(),
            });
        }
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Task",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Project> for InMemoryRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut all: Vec<Project> = projects.values().cloned().collect();
        all.sort_by_key(|p| (p.created_at, p.id));
        Ok(all)
    }

    async fn create(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Project",
                id: project.id.to_string(),
            });
        }
        projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        if !projects.contains_key(&project.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Project",
                id: project.id.to_string(),
            });
        }
        projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut projects = self.projects.write().await;
        if projects.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Project",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
