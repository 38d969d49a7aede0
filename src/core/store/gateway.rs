//! Typed access to a [`RecordStore`]

use super::{DataSource, MemoryStore, Query, RecordStore, RestStore, StoreError, Table};
use crate::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Cloneable handle decoding rows into model types
///
/// Every failure is logged before it is returned so callers only have to
/// surface it.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("store", &self.store.kind()).finish()
    }
}

impl Gateway {
    /// Wrap an existing store
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Gateway over a fresh copy of the demo data set
    #[must_use]
    pub fn fixture() -> Self {
        Self::new(Arc::new(MemoryStore::with_fixtures()))
    }

    /// Build the backend for a data source
    ///
    /// # Errors
    /// Returns [`StoreError::NotConfigured`] for a live source without endpoint.
    pub fn connect(source: DataSource, endpoint: &str, token: &str) -> Result<Self, StoreError> {
        match source {
            DataSource::Fixture => Ok(Self::fixture()),
            DataSource::Live => Ok(Self::new(Arc::new(RestStore::new(endpoint, token)?))),
        }
    }

    /// Backend label ("memory" or "rest")
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.store.kind()
    }

    fn logged<T>(
        action: &str,
        table: &str,
        result: Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        if let Err(e) = &result {
            error!("{action} {table} failed: {e}");
        }
        result
    }

    /// Decode every row matching `query`
    ///
    /// # Errors
    /// Transport or decode failures.
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> Result<Vec<T>, StoreError> {
        debug!("fetch {table} where {query}");
        let result: Result<Vec<T>, StoreError> = async {
            let rows = self.store.fetch(table, query).await?;
            rows.into_iter()
                .map(|row| serde_json::from_value(row).map_err(StoreError::from))
                .collect()
        }
        .await;
        Self::logged("fetch", table.name(), result)
    }

    /// Decode the row with the given id
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when no row has that id.
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        table: Table,
        id: &str,
    ) -> Result<T, StoreError> {
        let mut rows = self.fetch_collection(table, &Query::by_id(id).limit(1)).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound { table, id: id.to_string() });
        }
        Ok(rows.swap_remove(0))
    }

    /// Number of rows matching `query`
    ///
    /// # Errors
    /// Transport failures.
    pub async fn count(&self, table: Table, query: &Query) -> Result<usize, StoreError> {
        debug!("count {table} where {query}");
        Self::logged("count", table.name(), self.store.count(table, query).await)
    }

    /// Insert `fields` and decode the stored row
    ///
    /// # Errors
    /// Transport, decode, or read-only failures.
    pub async fn insert<F, T>(&self, table: Table, fields: &F) -> Result<T, StoreError>
    where
        F: Serialize + Sync,
        T: DeserializeOwned,
    {
        let result: Result<T, StoreError> = async {
            let row = serde_json::to_value(fields)?;
            let stored = self.store.insert(table, row).await?;
            Ok(serde_json::from_value(stored)?)
        }
        .await;
        let result = Self::logged("insert into", table.name(), result);
        if result.is_ok() {
            info!("Inserted record into {table}");
        }
        result
    }

    /// Patch the row with the given id
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when nothing was updated.
    pub async fn update(&self, table: Table, id: &str, fields: Value) -> Result<(), StoreError> {
        let updated = self.update_where(table, &Query::by_id(id), fields).await?;
        if updated == 0 {
            let err = StoreError::NotFound { table, id: id.to_string() };
            error!("update {table} failed: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Patch every row matching `query`; returns how many changed
    ///
    /// # Errors
    /// Transport or read-only failures.
    pub async fn update_where(
        &self,
        table: Table,
        query: &Query,
        fields: Value,
    ) -> Result<usize, StoreError> {
        debug!("update {table} where {query}");
        let updated = self.store.update(table, query, fields).await;
        let result = Self::logged("update", table.name(), updated);
        if let Ok(updated) = &result {
            info!("Updated {updated} record(s) in {table}");
        }
        result
    }

    /// Remove the row with the given id
    ///
    /// # Errors
    /// Transport or read-only failures.
    pub async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        Self::logged("delete from", table.name(), self.store.delete(table, id).await)?;
        info!("Deleted {table} record {id}");
        Ok(())
    }

    /// Upload a file and return its public URL
    ///
    /// # Errors
    /// Transport failures.
    pub async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let size = bytes.len();
        let uploaded = self.store.upload_file(bucket, path, bytes).await;
        let url = Self::logged("upload to", bucket, uploaded)?;
        info!("Uploaded {size} bytes to {bucket}/{path}");
        Ok(url)
    }
}
