//! Cached repository decorator.
//!
//! Wraps a `Repository<T>` implementation with the cache-aside pattern:
//!
//! - **Reads**: check cache first, on miss fetch from the repository and
//!   populate the cache with a TTL
//! - **Writes**: persist to the repository first, then invalidate the
//!   affected cache keys
//!
//! The cache is strictly best-effort. Every cache call runs under a short
//! operation timeout, and any error or timeout degrades to the durable
//! store. Invalidation failures after a successful durable write are
//! logged and swallowed: durability is authoritative.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use uuid::Uuid;

use taskstash_core::cache::{
    deserialize_resource, deserialize_resources, list_key, resource_key, serialize_resource,
    serialize_resources, Cache,
};
use taskstash_core::resource::Resource;
use taskstash_core::storage::{Repository, Result};

/// Cache-aside decorator for any resource repository.
///
/// One generic implementation serves every resource kind; the kind only
/// shows up in the cache keys (`{kind}:{id}`, `{kind}:list`).
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedRepository<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Duration,
    op_timeout: Duration,
}

impl<R, C> CachedRepository<R, C>
where
    C: Cache,
{
    /// Creates a new cached repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cached entries
    /// * `op_timeout` - Upper bound on any single cache call; a slower
    ///   cache is treated as unavailable for that call
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration, op_timeout: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
            op_timeout,
        }
    }

    /// Cache lookup that never fails: errors and timeouts become misses.
    async fn cache_get(&self, key: &str) -> Option<Vec<u8>> {
        match timeout(self.op_timeout, self.cache.get(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                tracing::warn!(key, error = %err, "Cache get failed, bypassing cache");
                None
            }
            Err(_) => {
                tracing::warn!(
                    key,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "Cache get timed out, bypassing cache"
                );
                None
            }
        }
    }

    /// Best-effort cache population.
    async fn cache_set(&self, key: &str, value: &[u8]) {
        match timeout(self.op_timeout, self.cache.set(key, value, Some(self.ttl))).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(key, error = %err, "Failed to populate cache");
            }
            Err(_) => {
                tracing::warn!(
                    key,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "Cache set timed out"
                );
            }
        }
    }

    /// Best-effort cache invalidation.
    async fn cache_delete(&self, key: &str) {
        match timeout(self.op_timeout, self.cache.delete(key)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(key, error = %err, "Failed to invalidate cache key");
            }
            Err(_) => {
                tracing::warn!(
                    key,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "Cache delete timed out"
                );
            }
        }
    }
}

#[async_trait]
impl<T, R, C> Repository<T> for CachedRepository<R, C>
where
    T: Resource + 'static,
    R: Repository<T> + 'static,
    C: Cache + 'static,
{
    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        let cache_key = resource_key(T::KIND, id);

        // Check cache first
        if let Some(bytes) = self.cache_get(&cache_key).await {
            match deserialize_resource::<T>(&bytes) {
                Ok(resource) => {
                    tracing::trace!(kind = %T::KIND, %id, "Cache hit");
                    return Ok(Some(resource));
                }
                // Undecodable bytes are treated as a miss
                Err(err) => {
                    tracing::warn!(kind = %T::KIND, %id, error = %err, "Cache entry deserialization failed");
                }
            }
        }

        // Cache miss - fetch from repository
        tracing::trace!(kind = %T::KIND, %id, "Cache miss");
        let resource = self.repository.get(id).await?;

        // Populate cache when the resource exists
        if let Some(ref found) = resource {
            if let Ok(bytes) = serialize_resource(found) {
                self.cache_set(&cache_key, &bytes).await;
            }
        }

        Ok(resource)
    }

    async fn list(&self) -> Result<Vec<T>> {
        let cache_key = list_key(T::KIND);

        // Check cache first
        if let Some(bytes) = self.cache_get(&cache_key).await {
            match deserialize_resources::<T>(&bytes) {
                Ok(resources) => {
                    tracing::trace!(kind = %T::KIND, count = resources.len(), "Cache hit for list");
                    return Ok(resources);
                }
                Err(err) => {
                    tracing::warn!(kind = %T::KIND, error = %err, "Cache list deserialization failed");
                }
            }
        }

        // Cache miss - fetch from repository
        tracing::trace!(kind = %T::KIND, "Cache miss for list");
        let resources = self.repository.list().await?;

        if let Ok(bytes) = serialize_resources(&resources) {
            self.cache_set(&cache_key, &bytes).await;
        }

        Ok(resources)
    }

    async fn create(&self, resource: &T) -> Result<()> {
        // 1. Persist to storage
        self.repository.create(resource).await?;

        // 2. Invalidate the list aggregate
        self.cache_delete(&list_key(T::KIND)).await;

        tracing::debug!(kind = %T::KIND, id = %resource.id(), "Resource created");
        Ok(())
    }

    async fn update(&self, resource: &T) -> Result<()> {
        // 1. Persist to storage
        self.repository.update(resource).await?;

        // 2. Invalidate the entity entry and the list aggregate
        self.cache_delete(&resource_key(T::KIND, resource.id())).await;
        self.cache_delete(&list_key(T::KIND)).await;

        tracing::debug!(kind = %T::KIND, id = %resource.id(), "Resource updated");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // 1. Persist deletion to storage
        self.repository.delete(id).await?;

        // 2. Invalidate the entity entry and the list aggregate
        self.cache_delete(&resource_key(T::KIND, id)).await;
        self.cache_delete(&list_key(T::KIND)).await;

        tracing::debug!(kind = %T::KIND, %id, "Resource deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    use taskstash_core::cache::Result as CacheResult;
    use taskstash_core::cache::CacheError;
    use taskstash_core::resource::Task;
    use taskstash_core::storage::RepositoryError;

    const TEST_TTL: Duration = Duration::from_secs(300);
    const TEST_OP_TIMEOUT: Duration = Duration::from_millis(100);

    // Mock repository that tracks calls
    struct MockRepository {
        tasks: RwLock<HashMap<Uuid, Task>>,
        get_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl MockRepository {
        fn new() -> Self {
            Self {
                tasks: RwLock::new(HashMap::new()),
                get_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
            }
        }

        async fn insert(&self, task: Task) {
            self.tasks.write().await.insert(task.id, task);
        }
    }

    #[async_trait]
    impl Repository<Task> for MockRepository {
        async fn get(&self, id: Uuid) -> Result<Option<Task>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.tasks.read().await.get(&id).cloned())
        }

        async fn list(&self) -> Result<Vec<Task>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let tasks = self.tasks.read().await;
            let mut all: Vec<Task> = tasks.values().cloned().collect();
            all.sort_by_key(|t| (t.created_at, t.id));
            Ok(all)
        }

        async fn create(&self, task: &Task) -> Result<()> {
            self.tasks.write().await.insert(task.id, task.clone());
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
            if self.tasks.write().await.remove(&id).is_none() {
                return Err(RepositoryError::NotFound {
                    entity_type: "Task",
                    id: id.to_string(),
                });
            }
            Ok(())
        }
    }

    // Mock cache
    struct MockCache {
        store: RwLock<HashMap<String, Vec<u8>>>,
    }

    impl MockCache {
        fn new() -> Self {
            Self {
                store: RwLock::new(HashMap::new()),
            }
        }

        async fn contains(&self, key: &str) -> bool {
            self.store.read().await.contains_key(key)
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
            Ok(self.store.read().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            self.store
                .write()
                .await
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn delete(&self, key: &str) -> CacheResult<()> {
            self.store.write().await.remove(key);
            Ok(())
        }
    }

    // Cache that fails every operation
    struct FailingCache;

    #[async_trait]
    impl Cache for FailingCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
            Err(CacheError::ConnectionFailed("refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            Err(CacheError::ConnectionFailed("refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::ConnectionFailed("refused".to_string()))
        }
    }

    // Cache that hangs far past the operation timeout
    struct SlowCache;

    #[async_trait]
    impl Cache for SlowCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    fn cached(
        repo: Arc<MockRepository>,
        cache: Arc<MockCache>,
    ) -> CachedRepository<MockRepository, MockCache> {
        CachedRepository::new(repo, cache, TEST_TTL, TEST_OP_TIMEOUT)
    }

    #[tokio::test]
    async fn test_get_cache_miss_fetches_and_populates() {
        let task = Task::new("Write report");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;
        let cache = Arc::new(MockCache::new());

        let store = cached(repo.clone(), cache.clone());

        let result = store.get(task.id).await.unwrap();
        assert_eq!(result.as_ref().map(|t| t.id), Some(task.id));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);

        // Verify cache was populated
        let cache_key = resource_key(Task::KIND, task.id);
        assert!(cache.contains(&cache_key).await);
    }

    #[tokio::test]
    async fn test_get_cache_hit_skips_repository() {
        let task = Task::new("Write report");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;
        let cache = Arc::new(MockCache::new());

        let store = cached(repo.clone(), cache.clone());

        // First call - cache miss
        let _ = store.get(task.id).await.unwrap();
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);

        // Second call - served from cache
        let result = store.get(task.id).await.unwrap();
        assert_eq!(result.as_ref().map(|t| t.title.clone()), Some(task.title));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1); // Still 1
    }

    #[tokio::test]
    async fn test_get_absent_resource_does_not_populate_cache() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let store = cached(repo.clone(), cache.clone());

        let id = Uuid::new_v4();
        let result = store.get(id).await.unwrap();
        assert!(result.is_none());
        assert!(!cache.contains(&resource_key(Task::KIND, id)).await);
    }

    #[tokio::test]
    async fn test_list_cache_miss_then_hit() {
        let repo = Arc::new(MockRepository::new());
        repo.insert(Task::new("one")).await;
        repo.insert(Task::new("two")).await;
        let cache = Arc::new(MockCache::new());

        let store = cached(repo.clone(), cache.clone());

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&list_key(Task::KIND)).await);

        let listed_again = store.list().await.unwrap();
        assert_eq!(listed_again.len(), 2);
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1); // Still 1
    }

    #[tokio::test]
    async fn test_hit_and_miss_return_identical_resources() {
        let task = Task::new("stable");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;
        let cache = Arc::new(MockCache::new());

        let store = cached(repo.clone(), cache.clone());

        let from_miss = store.get(task.id).await.unwrap().unwrap();
        let from_hit = store.get(task.id).await.unwrap().unwrap();

        assert_eq!(from_miss, from_hit);
        assert_eq!(
            serde_json::to_vec(&from_miss).unwrap(),
            serde_json::to_vec(&from_hit).unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_invalidates_list_key() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let store = cached(repo.clone(), cache.clone());

        // Pre-populate the list aggregate
        cache
            .set(&list_key(Task::KIND), b"cached_list", None)
            .await
            .unwrap();

        store.create(&Task::new("fresh")).await.unwrap();

        assert!(!cache.contains(&list_key(Task::KIND)).await);
    }

    #[tokio::test]
    async fn test_update_invalidates_entity_and_list_keys() {
        let task = Task::new("Write report");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;
        let cache = Arc::new(MockCache::new());
        let store = cached(repo.clone(), cache.clone());

        let entity_key = resource_key(Task::KIND, task.id);
        cache.set(&entity_key, b"cached_task", None).await.unwrap();
        cache
            .set(&list_key(Task::KIND), b"cached_list", None)
            .await
            .unwrap();

        store.update(&task).await.unwrap();

        assert!(!cache.contains(&entity_key).await);
        assert!(!cache.contains(&list_key(Task::KIND)).await);
    }

    #[tokio::test]
    async fn test_delete_invalidates_entity_and_list_keys() {
        let task = Task::new("Write report");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;
        let cache = Arc::new(MockCache::new());
        let store = cached(repo.clone(), cache.clone());

        let entity_key = resource_key(Task::KIND, task.id);
        cache.set(&entity_key, b"cached_task", None).await.unwrap();
        cache
            .set(&list_key(Task::KIND), b"cached_list", None)
            .await
            .unwrap();

        store.delete(task.id).await.unwrap();

        assert!(!cache.contains(&entity_key).await);
        assert!(!cache.contains(&list_key(Task::KIND)).await);
    }

    #[tokio::test]
    async fn test_failed_durable_write_does_not_invalidate() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let store = cached(repo.clone(), cache.clone());

        cache
            .set(&list_key(Task::KIND), b"cached_list", None)
            .await
            .unwrap();

        // Update of a task that was never created fails at the repository
        let result = store.update(&Task::new("ghost")).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));

        // Invalidation must not have run
        assert!(cache.contains(&list_key(Task::KIND)).await);
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_a_miss() {
        let task = Task::new("Write report");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;
        let cache = Arc::new(MockCache::new());
        let store = cached(repo.clone(), cache.clone());

        let entity_key = resource_key(Task::KIND, task.id);
        cache
            .set(&entity_key, b"definitely not json", None)
            .await
            .unwrap();

        let result = store.get(task.id).await.unwrap();
        assert_eq!(result.map(|t| t.id), Some(task.id));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_erroring_cache_degrades_to_repository() {
        let task = Task::new("Write report");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;

        let store = CachedRepository::new(
            repo.clone(),
            Arc::new(FailingCache),
            TEST_TTL,
            TEST_OP_TIMEOUT,
        );

        // Reads bypass the broken cache
        let result = store.get(task.id).await.unwrap();
        assert_eq!(result.map(|t| t.id), Some(task.id));

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);

        // Mutations still succeed even though invalidation fails
        store.delete(task.id).await.unwrap();
        assert!(store.get(task.id).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_cache_times_out_and_falls_through() {
        let task = Task::new("Write report");
        let repo = Arc::new(MockRepository::new());
        repo.insert(task.clone()).await;

        let store =
            CachedRepository::new(repo.clone(), Arc::new(SlowCache), TEST_TTL, TEST_OP_TIMEOUT);

        // The paused clock auto-advances, so the 60s sleeps inside SlowCache
        // trip the 100ms operation timeout instead of stalling the test.
        let result = store.get(task.id).await.unwrap();
        assert_eq!(result.map(|t| t.id), Some(task.id));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);

        store.update(&task).await.unwrap();
    }
}
