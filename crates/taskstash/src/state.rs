//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It uses repository trait objects for storage
//! abstraction and supports different backend combinations via feature
//! flags.

use std::sync::Arc;

use axum::extract::FromRef;

use taskstash_core::resource::{Project, Task};
use taskstash_core::storage::Repository;

use crate::auth::AuthState;
use crate::config::Config;

/// Shared application state.
///
/// This is cloned for each request handler and contains the cached
/// repository trait objects plus the auth token set.
#[derive(Clone)]
pub struct AppState {
    /// Task repository (cached, wraps underlying storage).
    pub tasks: Arc<dyn Repository<Task>>,
    /// Project repository (cached, wraps underlying storage).
    pub projects: Arc<dyn Repository<Project>>,
    /// Accepted API tokens.
    pub auth: AuthState,
}

impl AppState {
    /// Creates a new AppState with the given repositories and auth state.
    fn build(
        tasks: Arc<dyn Repository<Task>>,
        projects: Arc<dyn Repository<Project>>,
        auth: AuthState,
    ) -> Self {
        Self {
            tasks,
            projects,
            auth,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::{CachedRepository, InMemoryRepository};

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for testing without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            let store = Arc::new(CachedRepository::new(
                inmemory_repo,
                memory_cache,
                config.cache_ttl(),
                config.cache_op_timeout(),
            ));

            Ok(Self::build(
                store.clone(),
                store,
                AuthState::new(config.api_tokens.clone()),
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::{CachedRepository, InMemoryRepository};

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            let store = Arc::new(CachedRepository::new(
                inmemory_repo,
                redis_cache,
                config.cache_ttl(),
                config.cache_op_timeout(),
            ));

            Ok(Self::build(
                store.clone(),
                store,
                AuthState::new(config.api_tokens.clone()),
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::{CachedRepository, SqliteRepository};

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            let store = Arc::new(CachedRepository::new(
                sqlite_repo,
                memory_cache,
                config.cache_ttl(),
                config.cache_op_timeout(),
            ));

            Ok(Self::build(
                store.clone(),
                store,
                AuthState::new(config.api_tokens.clone()),
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::{CachedRepository, SqliteRepository};

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            let store = Arc::new(CachedRepository::new(
                sqlite_repo,
                redis_cache,
                config.cache_ttl(),
                config.cache_op_timeout(),
            ));

            Ok(Self::build(
                store.clone(),
                store,
                AuthState::new(config.api_tokens.clone()),
            ))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================


#[cfg(all(test, feature = "inmemory", feature = "memory"))]
pub use test_support::TEST_TOKEN;
