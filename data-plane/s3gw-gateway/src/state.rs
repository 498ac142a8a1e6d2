use s3gw_index::MemoryIndexStore;
use s3gw_listing::{
    BucketRecord, ContainerMetadata, ContainerMetadataLoader, IndexRole,
    ListingConfig, ListingEngine, MemoryMetadataStore, ObjectRecord,
    UploadRecord, encode_record,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::GatewayError;

/// Shared state behind every route.
///
/// Buckets and accounts are both containers: a bucket owns an objects index
/// and, once the first upload starts, a multipart index; an account owns the
/// index of its buckets.
#[derive(Clone)]
pub struct GatewayState {
    engine: ListingEngine,
    index: MemoryIndexStore,
    buckets: Arc<MemoryMetadataStore>,
    accounts: Arc<MemoryMetadataStore>,
    // serializes metadata read-modify-write
    catalog: Arc<Mutex<()>>,
}

impl GatewayState {
    pub fn new(config: ListingConfig, shutdown: CancellationToken) -> Self {
        let index = MemoryIndexStore::new();
        let engine = ListingEngine::new(config, Arc::new(index.clone()), shutdown);
        Self {
            engine,
            index,
            buckets: Arc::new(MemoryMetadataStore::new()),
            accounts: Arc::new(MemoryMetadataStore::new()),
            catalog: Arc::new(Mutex::new(())),
        }
    }

    pub fn engine(&self) -> &ListingEngine {
        &self.engine
    }

    pub(crate) fn bucket_loader(&self) -> Arc<dyn ContainerMetadataLoader> {
        self.buckets.clone()
    }

    pub(crate) fn account_loader(&self) -> Arc<dyn ContainerMetadataLoader> {
        self.accounts.clone()
    }

    /// Create `bucket` under `account`, registering the account on first use.
    ///
    /// Creating an existing bucket only refreshes its entry in the account.
    pub async fn create_bucket(
        &self,
        account: &str,
        bucket: &str,
        record: &BucketRecord,
    ) -> Result<(), GatewayError> {
        let _guard = self.catalog.lock().await;
        let mut owner = match self.accounts.get(account).await {
            Some(metadata) => metadata,
            None => ContainerMetadata::new(account),
        };
        let mut bucket_index = owner.index(IndexRole::Buckets);
        if bucket_index.is_empty() {
            bucket_index = self.index.create_index().await;
            owner.set_index(IndexRole::Buckets, bucket_index);
            self.accounts.put(owner).await;
        }
        self.index
            .put(&bucket_index, bucket, encode_record(record)?)
            .await?;

        if self.buckets.get(bucket).await.is_none() {
            let objects = self.index.create_index().await;
            self.buckets
                .put(
                    ContainerMetadata::new(bucket)
                        .with_index(IndexRole::Objects, objects),
                )
                .await;
            debug!(account, bucket, index = %objects, "created bucket");
        }
        Ok(())
    }

    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        record: &ObjectRecord,
    ) -> Result<(), GatewayError> {
        let metadata = self
            .buckets
            .get(bucket)
            .await
            .ok_or_else(|| GatewayError::NoSuchBucket(bucket.to_string()))?;
        let index = metadata.index(IndexRole::Objects);
        self.index.put(&index, key, encode_record(record)?).await?;
        Ok(())
    }

    /// Record an in-progress multipart upload of `key`.
    ///
    /// The multipart index is created with the first upload of the bucket.
    /// A key holds one in-progress upload; starting another replaces it.
    pub async fn start_upload(
        &self,
        bucket: &str,
        key: &str,
        record: &UploadRecord,
    ) -> Result<(), GatewayError> {
        if record.upload_id.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "upload id must not be empty".to_string(),
            ));
        }
        let _guard = self.catalog.lock().await;
        let mut metadata = self
            .buckets
            .get(bucket)
            .await
            .ok_or_else(|| GatewayError::NoSuchBucket(bucket.to_string()))?;
        let mut index = metadata.index(IndexRole::MultipartUploads);
        if index.is_empty() {
            index = self.index.create_index().await;
            metadata.set_index(IndexRole::MultipartUploads, index);
            self.buckets.put(metadata).await;
        }
        self.index.put(&index, key, encode_record(record)?).await?;
        Ok(())
    }
}
