//! Common test infrastructure for database integration tests.

use stash_config::DatabaseConfig;
use stash_repository::{DatabasePool, DatabasePoolInterface};
use std::sync::Arc;

/// Test database backed by a private in-memory SQLite instance.
pub struct TestDatabase {
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a fresh in-memory database and runs migrations.
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory database.
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 600,
        };

        let pool = DatabasePool::new(&config)
            .await
            .expect("Failed to open in-memory database");

        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self {
            pool: Arc::new(pool),
        }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }
}
