use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use s3gw_gateway::{ACCOUNT_HEADER, GatewayState, build_router};
use s3gw_listing::{BucketRecord, ListingConfig, ObjectRecord, UploadRecord};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;

async fn fixture(config: ListingConfig) -> (Router, CancellationToken) {
    let shutdown = CancellationToken::new();
    let state = GatewayState::new(config, shutdown.clone());
    for bucket in ["photos", "videos"] {
        state
            .create_bucket(
                "alice",
                bucket,
                &BucketRecord {
                    creation_date: "2024-01-01T00:00:00Z".to_string(),
                    location: "us-east-1".to_string(),
                },
            )
            .await
            .unwrap();
    }
    for (key, size) in [
        ("2023/a.jpg", 1),
        ("2023/b.jpg", 2),
        ("2024/c.jpg", 3),
        ("cover.jpg", 4),
        ("readme.txt", 5),
    ] {
        state
            .put_object(
                "photos",
                key,
                &ObjectRecord {
                    size,
                    etag: format!("etag-{size}"),
                    ..ObjectRecord::default()
                },
            )
            .await
            .unwrap();
    }
    for (key, upload_id) in [("big.iso", "u1"), ("huge.iso", "u2"), ("raw/x.bin", "u3")] {
        state
            .start_upload(
                "photos",
                key,
                &UploadRecord {
                    upload_id: upload_id.to_string(),
                    ..UploadRecord::default()
                },
            )
            .await
            .unwrap();
    }
    (build_router(state), shutdown)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, http::HeaderMap, Value) {
    get_with(app, Request::builder().uri(uri)).await
}

async fn get_with(
    app: &Router,
    builder: http::request::Builder,
) -> (StatusCode, http::HeaderMap, Value) {
    let res = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn keys(body: &Value, list: &str, field: &str) -> Vec<String> {
    body[list]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn healthz_is_ok() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, _, _) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_all_objects() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, headers, body) = get(&app, "/photos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[http::header::CONTENT_TYPE], "application/json");
    assert_eq!(
        keys(&body, "contents", "key"),
        ["2023/a.jpg", "2023/b.jpg", "2024/c.jpg", "cover.jpg", "readme.txt"]
    );
    assert_eq!(body["name"], "photos");
    assert_eq!(body["max_keys"], 1000);
    assert_eq!(body["is_truncated"], false);
    assert!(body.get("next_marker").is_none());
    assert_eq!(body["contents"][2]["size"], 3);
    assert_eq!(body["contents"][2]["etag"], "etag-3");
}

#[tokio::test(flavor = "multi_thread")]
async fn delimiter_rolls_up_prefixes() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, _, body) = get(&app, "/photos?delimiter=/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body, "contents", "key"), ["cover.jpg", "readme.txt"]);
    assert_eq!(body["common_prefixes"], serde_json::json!(["2023/", "2024/"]));

    let (_, _, body) = get(&app, "/photos?prefix=2023/&delimiter=/").await;
    assert_eq!(keys(&body, "contents", "key"), ["2023/a.jpg", "2023/b.jpg"]);
    assert_eq!(body["common_prefixes"], serde_json::json!([]));
    assert_eq!(body["prefix"], "2023/");
}

#[tokio::test(flavor = "multi_thread")]
async fn paginate_with_marker() {
    let (app, _) = fixture(ListingConfig::default().with_fetch_batch_size(2)).await;
    let (_, _, first) = get(&app, "/photos?max-keys=2").await;
    assert_eq!(keys(&first, "contents", "key"), ["2023/a.jpg", "2023/b.jpg"]);
    assert_eq!(first["is_truncated"], true);
    assert_eq!(first["next_marker"], "2023/b.jpg");

    let (_, _, second) = get(&app, "/photos?max-keys=2&marker=2023/b.jpg").await;
    assert_eq!(keys(&second, "contents", "key"), ["2024/c.jpg", "cover.jpg"]);
    assert_eq!(second["marker"], "2023/b.jpg");
    assert_eq!(second["next_marker"], "cover.jpg");

    let (_, _, last) = get(&app, "/photos?max-keys=2&marker=cover.jpg").await;
    assert_eq!(keys(&last, "contents", "key"), ["readme.txt"]);
    assert_eq!(last["is_truncated"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn ceiling_clamps_max_keys() {
    let config = ListingConfig::default()
        .with_max_count_ceiling(std::num::NonZeroUsize::new(3));
    let (app, _) = fixture(config).await;
    let (_, _, body) = get(&app, "/photos?max-keys=500").await;
    assert_eq!(body["max_keys"], 3);
    assert_eq!(body["contents"].as_array().unwrap().len(), 3);
    assert_eq!(body["is_truncated"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_uploads_and_resume() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, _, body) = get(&app, "/photos?uploads&max-uploads=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body, "uploads", "key"), ["big.iso", "huge.iso"]);
    assert_eq!(keys(&body, "uploads", "upload_id"), ["u1", "u2"]);
    assert_eq!(body["is_truncated"], true);
    assert_eq!(body["next_key_marker"], "huge.iso");
    assert_eq!(body["next_upload_id_marker"], "u2");

    let (_, _, body) = get(
        &app,
        "/photos?uploads&key-marker=huge.iso&upload-id-marker=u2",
    )
    .await;
    assert_eq!(keys(&body, "uploads", "key"), ["raw/x.bin"]);
    assert_eq!(body["upload_id_marker"], "u2");
    assert_eq!(body["is_truncated"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn upload_id_marker_needs_key_marker() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (_, _, body) = get(&app, "/photos?uploads&upload-id-marker=u2").await;
    assert_eq!(keys(&body, "uploads", "key"), ["big.iso", "huge.iso", "raw/x.bin"]);
    assert_eq!(body["upload_id_marker"], "");
}

#[tokio::test(flavor = "multi_thread")]
async fn bucket_without_uploads_is_empty() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, _, body) = get(&app, "/videos?uploads").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uploads"], serde_json::json!([]));
    assert_eq!(body["is_truncated"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_bucket_is_not_found() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, _, body) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NoSuchBucket");

    let (status, _, _) = get(&app, "/nope?uploads").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn bad_max_keys_is_rejected() {
    let (app, _) = fixture(ListingConfig::default()).await;
    for uri in ["/photos?max-keys=0", "/photos?max-keys=ten", "/photos?uploads&max-uploads=0"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "InvalidArgument");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_refuses_listings() {
    let (app, shutdown) = fixture(ListingConfig::default()).await;
    shutdown.cancel();
    let (status, headers, body) = get(&app, "/photos").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(headers[http::header::RETRY_AFTER], "1");
    assert_eq!(body["error"]["code"], "ServiceUnavailable");

    let (status, _, _) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_buckets_of_account() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, _, body) = get_with(
        &app,
        Request::builder().uri("/").header(ACCOUNT_HEADER, "alice"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"], "alice");
    assert_eq!(keys(&body, "buckets", "name"), ["photos", "videos"]);
    assert_eq!(body["buckets"][0]["location"], "us-east-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_account_has_no_buckets() {
    let (app, _) = fixture(ListingConfig::default()).await;
    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"], "default");
    assert_eq!(body["buckets"], serde_json::json!([]));
}
