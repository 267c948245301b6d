//! Location store seam: persistent name -> coordinate mapping.
//!
//! The registry only talks to this trait, so tests can run against the
//! in-memory double while the CLI wires up the SQLite backend.

use crate::models::StoredLocation;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
}

#[async_trait::async_trait]
pub trait LocationStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<StoredLocation>, StoreError>;
    async fn set(&self, name: &str, location: StoredLocation) -> Result<(), StoreError>;
    async fn remove(&self, name: &str) -> Result<(), StoreError>;
    /// Names currently present, for orphan reconciliation.
    async fn names(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store, mainly a test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredLocation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LocationStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<StoredLocation>, StoreError> {
        Ok(self.entries.lock().unwrap().get(name).copied())
    }

    async fn set(&self, name: &str, location: StoredLocation) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), location);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(name);
        Ok(())
    }

    async fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
