use bytes::Bytes;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::marker::PhantomData;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Json parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns a raw index value into a typed record
pub trait EntryCodec: Send + Sync + 'static {
    type Record: Clone + Default + Debug + Send + Sync + 'static;

    fn decode(&self, raw: &[u8]) -> Result<Self::Record, CodecError>;

    /// Identifier telling apart rows that share a primary key
    fn secondary_id<'a>(&self, _record: &'a Self::Record) -> Option<&'a str> {
        None
    }
}

/// A record stored as JSON in an index value
pub trait Record:
    Serialize + DeserializeOwned + Clone + Default + Debug + Send + Sync + 'static
{
    fn secondary_id(&self) -> Option<&str> {
        None
    }
}

pub struct JsonCodec<R>(PhantomData<fn() -> R>);

impl<R> JsonCodec<R> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for JsonCodec<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for JsonCodec<R> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<R> Debug for JsonCodec<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<R: Record> EntryCodec for JsonCodec<R> {
    type Record = R;

    fn decode(&self, raw: &[u8]) -> Result<R, CodecError> {
        Ok(serde_json::from_slice(raw)?)
    }

    fn secondary_id<'a>(&self, record: &'a R) -> Option<&'a str> {
        record.secondary_id()
    }
}

pub fn encode_record<R: Record>(record: &R) -> Result<Bytes, CodecError> {
    Ok(Bytes::from(serde_json::to_vec(record)?))
}

/// Metadata of one stored object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRecord {
    pub size: u64,
    pub etag: String,
    pub last_modified: String,
    pub storage_class: String,
    pub owner: String,
}

impl Record for ObjectRecord {}

/// An in-progress multipart upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadRecord {
    pub upload_id: String,
    pub initiated: String,
    pub storage_class: String,
    pub owner: String,
}

impl Record for UploadRecord {
    fn secondary_id(&self) -> Option<&str> {
        Some(self.upload_id.as_str()).filter(|id| !id.is_empty())
    }
}

/// A bucket owned by an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketRecord {
    pub creation_date: String,
    pub location: String,
}

impl Record for BucketRecord {}

pub type ObjectCodec = JsonCodec<ObjectRecord>;
pub type UploadCodec = JsonCodec<UploadRecord>;
pub type BucketCodec = JsonCodec<BucketRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_secondary_id() {
        let codec = UploadCodec::new();
        let record = codec
            .decode(br#"{"upload_id":"u-1","initiated":"2024-01-01T00:00:00Z"}"#)
            .unwrap();
        assert_eq!(codec.secondary_id(&record), Some("u-1"));
        assert_eq!(codec.secondary_id(&UploadRecord::default()), None);
    }

    #[test]
    fn objects_have_no_secondary_id() {
        let codec = ObjectCodec::new();
        let record = codec.decode(br#"{"size":3}"#).unwrap();
        assert_eq!(record.size, 3);
        assert_eq!(codec.secondary_id(&record), None);
    }

    #[test]
    fn malformed_value_fails() {
        let codec = BucketCodec::new();
        assert!(matches!(codec.decode(b"{not json"), Err(CodecError::Json(_))));
    }
}
