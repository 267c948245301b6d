//! Storage layer: SQLite-backed location store.
//!
//! Holds DB pool setup, schema migration, and the [`LocationStore`]
//! implementation the CLI wires into the registry.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tilevault_core::models::StoredLocation;
use tilevault_core::store::{LocationStore, StoreError};

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let mut url = database_url.to_string();
    if !database_url.starts_with("sqlite:") {
        let path = std::path::PathBuf::from(database_url);
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let norm = path.to_string_lossy().replace('\\', "/");
        // mode=rwc creates the database file on first open.
        if path.is_absolute() {
            url = format!("sqlite:///{}?mode=rwc", norm.trim_start_matches('/'));
        } else {
            url = format!("sqlite://{}?mode=rwc", norm);
        }
    }
    let max_connections = if url.contains("memory") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;
    Ok(pool)
}

/// Applies the schema. Idempotent; safe to run on every startup.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS locations (
            name TEXT PRIMARY KEY,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects and migrates in one step.
    pub async fn open(database_url: &str) -> anyhow::Result<Self> {
        let pool = connect(database_url).await?;
        migrate(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl LocationStore for SqliteStore {
    async fn get(&self, name: &str) -> Result<Option<StoredLocation>, StoreError> {
        let row = sqlx::query("SELECT latitude, longitude FROM locations WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(|r| StoredLocation {
            latitude: r.get(0),
            longitude: r.get(1),
        }))
    }

    async fn set(&self, name: &str, location: StoredLocation) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO locations (name, latitude, longitude, updated_at)
             VALUES (?1, ?2, ?3, strftime('%s','now'))
             ON CONFLICT(name) DO UPDATE SET
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                updated_at = excluded.updated_at",
        )
        .bind(name)
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM locations WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn names(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT name FROM locations ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.iter().map(|r| r.get(0)).collect())
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
