use async_trait::async_trait;
use s3gw_index::IndexHandle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Which of a container's indexes a listing walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexRole {
    Objects,
    MultipartUploads,
    Buckets,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerMetadata {
    pub name: String,
    indexes: HashMap<IndexRole, IndexHandle>,
}

impl ContainerMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: HashMap::new(),
        }
    }

    pub fn with_index(mut self, role: IndexRole, index: IndexHandle) -> Self {
        self.indexes.insert(role, index);
        self
    }

    pub fn set_index(&mut self, role: IndexRole, index: IndexHandle) {
        self.indexes.insert(role, index);
    }

    /// Handle for `role`, [`IndexHandle::EMPTY`] if none was ever created
    pub fn index(&self, role: IndexRole) -> IndexHandle {
        self.indexes.get(&role).copied().unwrap_or(IndexHandle::EMPTY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLoad {
    Present(ContainerMetadata),
    Absent,
    Failed(String),
}

/// Resolves a container name to its metadata
#[async_trait]
pub trait ContainerMetadataLoader: Send + Sync {
    async fn load(&self, container: &str) -> MetadataLoad;
}

/// In-memory metadata store keyed by container name
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataStore {
    containers: Arc<RwLock<HashMap<String, ContainerMetadata>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, metadata: ContainerMetadata) {
        self.containers
            .write()
            .await
            .insert(metadata.name.clone(), metadata);
    }

    pub async fn get(&self, name: &str) -> Option<ContainerMetadata> {
        self.containers.read().await.get(name).cloned()
    }
}

#[async_trait]
impl ContainerMetadataLoader for MemoryMetadataStore {
    async fn load(&self, container: &str) -> MetadataLoad {
        match self.get(container).await {
            Some(metadata) => MetadataLoad::Present(metadata),
            None => MetadataLoad::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_present_and_absent() {
        let store = MemoryMetadataStore::new();
        let meta = ContainerMetadata::new("photos")
            .with_index(IndexRole::Objects, IndexHandle::new(0, 7));
        store.put(meta.clone()).await;

        assert_eq!(store.load("photos").await, MetadataLoad::Present(meta));
        assert_eq!(store.load("videos").await, MetadataLoad::Absent);
    }

    #[test]
    fn missing_role_is_empty_handle() {
        let meta = ContainerMetadata::new("photos")
            .with_index(IndexRole::Objects, IndexHandle::new(0, 7));
        assert!(meta.index(IndexRole::MultipartUploads).is_empty());
        assert_eq!(meta.index(IndexRole::Objects), IndexHandle::new(0, 7));
    }
}
