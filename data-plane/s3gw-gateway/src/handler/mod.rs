use crate::state::GatewayState;
use axum::routing::get;
use axum::{Extension, Router};
use http::StatusCode;

mod render;
mod rest;

pub use rest::{ACCOUNT_HEADER, DEFAULT_ACCOUNT};

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(rest::list_buckets))
        .route("/healthz", get(healthz))
        .route("/{bucket}", get(rest::list_bucket))
        .layer(Extension(state))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
