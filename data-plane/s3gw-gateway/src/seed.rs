use s3gw_listing::{BucketRecord, ObjectRecord, UploadRecord};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::GatewayError;
use crate::state::GatewayState;

/// Initial catalog contents, loaded from a JSON file at startup.
///
/// ```json
/// {"accounts": [{"name": "alice", "buckets": [
///     {"name": "photos", "objects": [{"key": "a.jpg", "size": 3}]}
/// ]}]}
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
}

#[derive(Debug, Deserialize)]
pub struct AccountSeed {
    pub name: String,
    #[serde(default)]
    pub buckets: Vec<BucketSeed>,
}

#[derive(Debug, Deserialize)]
pub struct BucketSeed {
    pub name: String,
    #[serde(flatten)]
    pub record: BucketRecord,
    #[serde(default)]
    pub objects: Vec<ObjectSeed>,
    #[serde(default)]
    pub uploads: Vec<UploadSeed>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectSeed {
    pub key: String,
    #[serde(flatten)]
    pub record: ObjectRecord,
}

#[derive(Debug, Deserialize)]
pub struct UploadSeed {
    pub key: String,
    #[serde(flatten)]
    pub record: UploadRecord,
}

impl Seed {
    pub fn from_slice(raw: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(raw).map_err(|e| GatewayError::Seed(e.to_string()))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await.map_err(|e| {
            GatewayError::Seed(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_slice(&raw)
    }

    pub async fn apply(&self, state: &GatewayState) -> Result<(), GatewayError> {
        let mut objects = 0;
        let mut uploads = 0;
        for account in &self.accounts {
            for bucket in &account.buckets {
                state
                    .create_bucket(&account.name, &bucket.name, &bucket.record)
                    .await?;
                for object in &bucket.objects {
                    state
                        .put_object(&bucket.name, &object.key, &object.record)
                        .await?;
                }
                for upload in &bucket.uploads {
                    state
                        .start_upload(&bucket.name, &upload.key, &upload.record)
                        .await?;
                }
                objects += bucket.objects.len();
                uploads += bucket.uploads.len();
            }
        }
        info!(
            accounts = self.accounts.len(),
            objects, uploads, "applied seed catalog"
        );
        Ok(())
    }
}
