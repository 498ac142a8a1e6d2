use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{IndexHandle, IndexRow, IndexScanner, ScanError, ScanResult};

type Rows = BTreeMap<String, Bytes>;

/// In-memory ordered index store.
///
/// Every index is a sorted map, so scans always come back in ascending key
/// order. Clones share the same underlying data.
#[derive(Debug, Clone)]
pub struct MemoryIndexStore {
    indexes: Arc<RwLock<HashMap<IndexHandle, Rows>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for MemoryIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self {
            indexes: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Allocate a fresh, empty index
    pub async fn create_index(&self) -> IndexHandle {
        let handle =
            IndexHandle::new(0, self.next_id.fetch_add(1, Ordering::Relaxed));
        self.indexes.write().await.insert(handle, Rows::new());
        debug!(index = %handle, "created index");
        handle
    }

    pub async fn put(
        &self,
        index: &IndexHandle,
        key: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> ScanResult<()> {
        let mut indexes = self.indexes.write().await;
        let rows = indexes.get_mut(index).ok_or_else(|| {
            ScanError::invalid_operation(format!("index {index} does not exist"))
        })?;
        rows.insert(key.into(), value.into());
        Ok(())
    }

    /// Number of rows in an index, zero if it does not exist
    pub async fn len(&self, index: &IndexHandle) -> usize {
        self.indexes
            .read()
            .await
            .get(index)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl IndexScanner for MemoryIndexStore {
    async fn scan_batch(
        &self,
        index: &IndexHandle,
        start: Bound<&str>,
        batch_size: usize,
    ) -> ScanResult<Vec<IndexRow>> {
        if batch_size == 0 {
            return Err(ScanError::invalid_operation(
                "batch size must be positive",
            ));
        }
        let indexes = self.indexes.read().await;
        let rows = indexes.get(index).ok_or(ScanError::NoMatchingEntries)?;
        let batch: Vec<IndexRow> = rows
            .range::<str, _>((start, Bound::Unbounded))
            .take(batch_size)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if batch.is_empty() {
            return Err(ScanError::NoMatchingEntries);
        }
        Ok(batch)
    }
}
