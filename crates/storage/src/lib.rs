use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create parent directory '{}' for database url '{database_url}': {source}", .path.display())]
    CreateDir {
        database_url: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open record store '{database_url}': {source}")]
    Open {
        database_url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to read record '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to write record '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to remove record '{key}': {source}")]
    Remove {
        key: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Durable named records holding serialized text, one value per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Overwrites any previous value stored under `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a key that was never written is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: Pool<Sqlite>,
}

impl SqliteKeyValueStore {
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let open_error = |source: sqlx::Error| StorageError::Open {
            database_url: database_url.to_string(),
            source,
        };

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(open_error)?
            .create_if_missing(true);

        // A single connection keeps `sqlite::memory:` pointing at one database.
        let mut pool_options = SqlitePoolOptions::new().max_connections(1);
        if database_url.starts_with(MEMORY_DATABASE_URL) {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(open_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_records (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(open_error)?;

        debug!(database_url, "opened record store");
        Ok(Self { pool })
    }

    pub async fn in_memory() -> Result<Self, StorageError> {
        Self::open(MEMORY_DATABASE_URL).await
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_records WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| StorageError::Read {
                key: key.to_string(),
                source,
            })?;
        Ok(row.map(|row| row.get::<String, _>(0)))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO kv_records (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_records WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|source| StorageError::Remove {
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// Process-local store, lost on exit.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.records.lock().await.remove(key);
        Ok(())
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<(), StorageError> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
        database_url: database_url.to_string(),
        path: parent.to_path_buf(),
        source,
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with(MEMORY_DATABASE_URL) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
