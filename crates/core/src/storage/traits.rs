use async_trait::async_trait;
use uuid::Uuid;

use crate::resource::Resource;

use super::Result;

/// Repository for a single resource kind.
///
/// One generic trait covers every kind; backends implement it once per
/// resource type instead of repeating near-identical per-kind traits.
/// `get` reports absence as `Ok(None)`; `update` and `delete` on an
/// unknown id fail with [`super::RepositoryError::NotFound`].
#[async_trait]
pub trait Repository<T: Resource>: Send + Sync {
    /// Gets a resource by its ID.
    async fn get(&self, id: Uuid) -> Result<Option<T>>;

    /// Gets all resources of this kind, in insertion order.
    async fn list(&self) -> Result<Vec<T>>;

    /// Creates a new resource.
    async fn create(&self, resource: &T) -> Result<()>;

    /// Fully replaces an existing resource.
    async fn update(&self, resource: &T) -> Result<()>;

    /// Deletes a resource by its ID.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
