use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 900)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Upper bound on a single cache call in milliseconds (default: 100)
    pub cache_op_timeout_ms: u64,
    /// Path to SQLite database file (default: "taskstash.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Accepted API tokens (comma-separated in the environment).
    pub api_tokens: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 900)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_OP_TIMEOUT_MS` - Per-call cache timeout (default: 100)
    /// - `SQLITE_PATH` - SQLite database path (default: "taskstash.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `API_TOKENS` - Comma-separated list of accepted bearer tokens
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cache_op_timeout_ms: env::var("CACHE_OP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "taskstash.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            api_tokens: env::var("API_TOKENS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the per-call cache timeout as a Duration.
    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_op_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_conversions() {
        let config = Config {
            cache_ttl_seconds: 600,
            cache_max_entries: 10_000,
            cache_op_timeout_ms: 50,
            sqlite_path: "test.db".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            api_tokens: vec![],
        };

        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.cache_op_timeout(), Duration::from_millis(50));
    }

    #[test]
    fn test_token_list_parsing() {
        env::set_var("API_TOKENS", "alpha, beta,,gamma ");

        let config = Config::from_env();
        assert_eq!(
            config.api_tokens,
            vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()]
        );

        env::remove_var("API_TOKENS");
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("CACHE_TTL_SECONDS");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("CACHE_OP_TIMEOUT_MS");
        env::remove_var("SQLITE_PATH");
        env::remove_var("REDIS_URL");

        let config = Config::from_env();

        assert_eq!(config.cache_ttl_seconds, 900);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_op_timeout_ms, 100);
        assert_eq!(config.sqlite_path, "taskstash.db");
        assert_eq!(config.redis_url, "redis://localhost:6379");
    }
}
