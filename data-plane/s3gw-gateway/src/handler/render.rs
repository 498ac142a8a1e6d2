use s3gw_listing::{
    BucketRecord, Entry, ListingRequest, ListingResult, ObjectRecord,
    UploadRecord,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListObjectsBody {
    pub name: String,
    pub prefix: String,
    pub delimiter: String,
    pub marker: String,
    pub max_keys: usize,
    pub is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    pub contents: Vec<ObjectItem>,
    pub common_prefixes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ObjectItem {
    pub key: String,
    pub size: u64,
    pub etag: String,
    pub last_modified: String,
    pub storage_class: String,
    pub owner: String,
}

impl From<Entry<ObjectRecord>> for ObjectItem {
    fn from(entry: Entry<ObjectRecord>) -> Self {
        let ObjectRecord {
            size,
            etag,
            last_modified,
            storage_class,
            owner,
        } = entry.payload;
        Self {
            key: entry.key,
            size,
            etag,
            last_modified,
            storage_class,
            owner,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListUploadsBody {
    pub bucket: String,
    pub prefix: String,
    pub delimiter: String,
    pub key_marker: String,
    pub upload_id_marker: String,
    pub max_uploads: usize,
    pub is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_key_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_upload_id_marker: Option<String>,
    pub uploads: Vec<UploadItem>,
    pub common_prefixes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadItem {
    pub key: String,
    pub upload_id: String,
    pub initiated: String,
    pub storage_class: String,
    pub owner: String,
}

impl From<Entry<UploadRecord>> for UploadItem {
    fn from(entry: Entry<UploadRecord>) -> Self {
        let UploadRecord {
            upload_id,
            initiated,
            storage_class,
            owner,
        } = entry.payload;
        Self {
            key: entry.key,
            upload_id,
            initiated,
            storage_class,
            owner,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListBucketsBody {
    pub owner: String,
    pub buckets: Vec<BucketItem>,
}

#[derive(Debug, Serialize)]
pub struct BucketItem {
    pub name: String,
    pub creation_date: String,
    pub location: String,
}

impl From<Entry<BucketRecord>> for BucketItem {
    fn from(entry: Entry<BucketRecord>) -> Self {
        Self {
            name: entry.key,
            creation_date: entry.payload.creation_date,
            location: entry.payload.location,
        }
    }
}

pub fn list_objects_body(
    request: ListingRequest,
    max_keys: usize,
    result: ListingResult<ObjectRecord>,
) -> ListObjectsBody {
    let next_marker = result
        .next_marker
        .filter(|_| result.truncated)
        .map(|marker| marker.key);
    ListObjectsBody {
        name: request.container,
        prefix: request.prefix.unwrap_or_default(),
        delimiter: request.delimiter.unwrap_or_default(),
        marker: request.marker.map(|m| m.key).unwrap_or_default(),
        max_keys,
        is_truncated: result.truncated,
        next_marker,
        contents: result.entries.into_iter().map(ObjectItem::from).collect(),
        common_prefixes: result.common_prefixes.into_iter().collect(),
    }
}

pub fn list_uploads_body(
    request: ListingRequest,
    max_uploads: usize,
    result: ListingResult<UploadRecord>,
) -> ListUploadsBody {
    let (key_marker, upload_id_marker) = match request.marker {
        Some(marker) => (marker.key, marker.secondary.unwrap_or_default()),
        None => (String::new(), String::new()),
    };
    let (next_key_marker, next_upload_id_marker) =
        match result.next_marker.filter(|_| result.truncated) {
            Some(marker) => (Some(marker.key), marker.secondary),
            None => (None, None),
        };
    ListUploadsBody {
        bucket: request.container,
        prefix: request.prefix.unwrap_or_default(),
        delimiter: request.delimiter.unwrap_or_default(),
        key_marker,
        upload_id_marker,
        max_uploads,
        is_truncated: result.truncated,
        next_key_marker,
        next_upload_id_marker,
        uploads: result.entries.into_iter().map(UploadItem::from).collect(),
        common_prefixes: result.common_prefixes.into_iter().collect(),
    }
}

pub fn list_buckets_body(
    account: String,
    result: ListingResult<BucketRecord>,
) -> ListBucketsBody {
    ListBucketsBody {
        owner: account,
        buckets: result.entries.into_iter().map(BucketItem::from).collect(),
    }
}
