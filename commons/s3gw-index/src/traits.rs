use crate::{IndexHandle, ScanResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Bound;

/// One index row: the primary key and its raw, still-encoded value.
pub type IndexRow = (String, Bytes);

/// Ordered, batched read access to a key-value index.
#[async_trait]
pub trait IndexScanner: Send + Sync {
    /// Return up to `batch_size` rows in ascending key order, starting at
    /// `start`.
    ///
    /// An empty result is never returned as `Ok`: a scan that matches no
    /// rows, or targets an index that does not exist, fails with
    /// [`ScanError::NoMatchingEntries`](crate::ScanError::NoMatchingEntries).
    async fn scan_batch(
        &self,
        index: &IndexHandle,
        start: Bound<&str>,
        batch_size: usize,
    ) -> ScanResult<Vec<IndexRow>>;
}
