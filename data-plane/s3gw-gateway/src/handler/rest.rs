use crate::error::GatewayError;
use crate::handler::render;
use crate::state::GatewayState;
use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use s3gw_listing::{
    BucketCodec, EntryCodec, ListingProfile, ListingRequest,
    ListingResult, ListingTask, Marker, ObjectCodec, UploadCodec,
    response_channel,
};
use std::num::NonZeroUsize;
use tracing::{debug, warn};

pub const ACCOUNT_HEADER: &str = "x-account-id";
pub const DEFAULT_ACCOUNT: &str = "default";

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct BucketQuery {
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub marker: Option<String>,
    pub max_keys: Option<String>,
    /// Present (with any value) for the multipart upload listing.
    pub uploads: Option<String>,
    pub key_marker: Option<String>,
    pub upload_id_marker: Option<String>,
    pub max_uploads: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a `max-keys` style parameter. Absent means the default cap.
pub fn parse_max_count(
    name: &str,
    value: Option<&str>,
) -> Result<Option<NonZeroUsize>, GatewayError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .map(Some)
        .ok_or_else(|| {
            GatewayError::InvalidArgument(format!(
                "{name} must be a positive integer, got '{raw}'"
            ))
        })
}

/// Spawn one listing task and wait for its single outcome
async fn run_listing<C: EntryCodec>(
    task: ListingTask<C>,
    container: &str,
) -> Result<ListingResult<C::Record>, GatewayError> {
    let (sink, rx) = response_channel();
    tokio::spawn(task.run(sink));
    match rx.recv_async().await {
        Ok(outcome) => GatewayError::from_outcome(outcome, container),
        Err(_) => {
            warn!(container, "listing task dropped its response");
            Err(GatewayError::TaskAborted)
        }
    }
}

pub async fn list_bucket(
    Path(bucket): Path<String>,
    Query(query): Query<BucketQuery>,
    Extension(state): Extension<GatewayState>,
) -> Result<Response, GatewayError> {
    if query.uploads.is_some() {
        list_uploads(bucket, query, &state)
            .await
            .map(IntoResponse::into_response)
    } else {
        list_objects(bucket, query, &state)
            .await
            .map(IntoResponse::into_response)
    }
}

async fn list_objects(
    bucket: String,
    query: BucketQuery,
    state: &GatewayState,
) -> Result<Json<render::ListObjectsBody>, GatewayError> {
    let max_count = parse_max_count("max-keys", query.max_keys.as_deref())?;
    let mut request = ListingRequest::new(bucket.clone()).with_max_count(max_count);
    request.prefix = non_empty(query.prefix);
    request.delimiter = non_empty(query.delimiter);
    request.marker = non_empty(query.marker).map(Marker::new);
    debug!(?request, "list objects");

    let max_keys = state
        .engine()
        .config()
        .effective_max_count(request.max_count)
        .get();
    let task = state.engine().task(
        ListingProfile::OBJECTS,
        state.bucket_loader(),
        ObjectCodec::new(),
        request.clone(),
    );
    let result = run_listing(task, &bucket).await?;
    Ok(Json(render::list_objects_body(request, max_keys, result)))
}

async fn list_uploads(
    bucket: String,
    query: BucketQuery,
    state: &GatewayState,
) -> Result<Json<render::ListUploadsBody>, GatewayError> {
    let max_count =
        parse_max_count("max-uploads", query.max_uploads.as_deref())?;
    let mut request = ListingRequest::new(bucket.clone()).with_max_count(max_count);
    request.prefix = non_empty(query.prefix);
    request.delimiter = non_empty(query.delimiter);
    // an upload id marker only means something next to a key marker
    request.marker = non_empty(query.key_marker).map(|key| {
        match non_empty(query.upload_id_marker) {
            Some(upload_id) => Marker::new(key).with_secondary(upload_id),
            None => Marker::new(key),
        }
    });
    debug!(?request, "list multipart uploads");

    let max_uploads = state
        .engine()
        .config()
        .effective_max_count(request.max_count)
        .get();
    let task = state.engine().task(
        ListingProfile::MULTIPART_UPLOADS,
        state.bucket_loader(),
        UploadCodec::new(),
        request.clone(),
    );
    let result = run_listing(task, &bucket).await?;
    Ok(Json(render::list_uploads_body(request, max_uploads, result)))
}

pub async fn list_buckets(
    headers: HeaderMap,
    Extension(state): Extension<GatewayState>,
) -> Result<Json<render::ListBucketsBody>, GatewayError> {
    let account = headers
        .get(ACCOUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_ACCOUNT)
        .to_string();
    debug!(account = %account, "list buckets");

    let task = state.engine().task(
        ListingProfile::BUCKETS,
        state.account_loader(),
        BucketCodec::new(),
        ListingRequest::new(account.clone()),
    );
    let result = run_listing(task, &account).await?;
    Ok(Json(render::list_buckets_body(account, result)))
}
