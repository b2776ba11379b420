//! Persistent geocode store
//!
//! Rows are keyed by the normalized search query, so a key holds at most one
//! location; a repeated put replaces the row.

use async_trait::async_trait;
use fjall::Keyspace;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tokio::task;

use crate::models::Location;
use crate::{ExplorerError, Result};

/// Storage capability for cached geocode rows
#[async_trait]
pub trait GeocodeStore: Send + Sync {
    /// Row stored under a normalized query, if any
    async fn get(&self, search_query: &str) -> Result<Option<Location>>;

    /// Persist a row under its own `search_query`
    async fn put(&self, location: &Location) -> Result<()>;
}

/// On-disk store backed by a fjall keyspace
pub struct FjallStore {
    rows: Keyspace,
}

fn get_from_store(rows: Keyspace, key: Vec<u8>) -> anyhow::Result<Option<Vec<u8>>> {
    Ok(rows.get(key)?.map(|v| v.to_vec()))
}

impl FjallStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path).open().map_err(|e| {
            ExplorerError::store(format!("failed to open {}: {e}", path.display()))
        })?;
        let rows = db
            .keyspace("geocode", fjall::KeyspaceCreateOptions::default)
            .map_err(|e| ExplorerError::store(format!("failed to open keyspace: {e}")))?;
        Ok(Self { rows })
    }
}

#[async_trait]
impl GeocodeStore for FjallStore {
    #[tracing::instrument(name = "query_store", level = "debug", skip(self))]
    async fn get(&self, search_query: &str) -> Result<Option<Location>> {
        let rows = self.rows.clone();
        let key = search_query.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(rows, key))
            .await
            .map_err(|e| ExplorerError::store(format!("lookup task failed: {e}")))?
            .map_err(|e| ExplorerError::store(format!("lookup failed: {e}")))?;

        maybe_bytes
            .map(|bytes| {
                postcard::from_bytes::<Location>(&bytes)
                    .map_err(|e| ExplorerError::store(format!("corrupt row: {e}")))
            })
            .transpose()
    }

    #[tracing::instrument(name = "put_store", level = "debug", skip(self))]
    async fn put(&self, location: &Location) -> Result<()> {
        let rows = self.rows.clone();
        let key = location.search_query.as_bytes().to_vec();
        let bytes = postcard::to_stdvec(location)
            .map_err(|e| ExplorerError::store(format!("failed to encode row: {e}")))?;

        task::spawn_blocking(move || rows.insert(key, bytes))
            .await
            .map_err(|e| ExplorerError::store(format!("write task failed: {e}")))?
            .map_err(|e| ExplorerError::store(format!("write failed: {e}")))?;
        Ok(())
    }
}

/// In-process store for tests and embedding
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<String, Location>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with rows
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = Location>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| (row.search_query.clone(), row))
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl GeocodeStore for MemoryStore {
    async fn get(&self, search_query: &str) -> Result<Option<Location>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| ExplorerError::store("memory store lock poisoned"))?;
        Ok(rows.get(search_query).cloned())
    }

    async fn put(&self, location: &Location) -> Result<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| ExplorerError::store("memory store lock poisoned"))?;
        rows.insert(location.search_query.clone(), location.clone());
        Ok(())
    }
}
