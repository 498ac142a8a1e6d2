use axum::response::IntoResponse;
use http::StatusCode;
use s3gw_index::ScanError;
use s3gw_listing::{CodecError, ListingOutcome, ListingResult};
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("The specified bucket does not exist: {0}")]
    NoSuchBucket(String),
    #[error("Service is shutting down, retry later")]
    ServiceUnavailable { retry_after: Duration },
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("Index error: {0}")]
    IndexError(#[from] ScanError),
    #[error("Codec error: {0}")]
    CodecError(#[from] CodecError),
    #[error("Listing task ended without a response")]
    TaskAborted,
    #[error("Seed error: {0}")]
    Seed(String),
}

impl GatewayError {
    /// Turn a listing outcome into the page it carries, or the matching error
    pub fn from_outcome<R>(
        outcome: ListingOutcome<R>,
        container: &str,
    ) -> Result<ListingResult<R>, GatewayError> {
        match outcome {
            ListingOutcome::Success(result) => Ok(result),
            ListingOutcome::NotFound => {
                Err(GatewayError::NoSuchBucket(container.to_string()))
            }
            ListingOutcome::ServiceUnavailable { retry_after } => {
                Err(GatewayError::ServiceUnavailable { retry_after })
            }
            ListingOutcome::InternalError(reason) => {
                Err(GatewayError::InternalError(reason))
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        use GatewayError::*;
        let (code, code_str) = match &self {
            InvalidArgument(_) => (StatusCode::BAD_REQUEST, "InvalidArgument"),
            NoSuchBucket(_) => (StatusCode::NOT_FOUND, "NoSuchBucket"),
            ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailable")
            }
            InternalError(_) | IndexError(_) | CodecError(_) | TaskAborted
            | Seed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };
        let body = serde_json::json!({
            "error": { "code": code_str, "message": self.to_string() }
        });
        let mut resp = (code, body.to_string()).into_response();
        resp.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        if let ServiceUnavailable { retry_after } = &self {
            // whole seconds, never advertise 0
            let secs = retry_after.as_secs().max(1);
            resp.headers_mut().insert(
                http::header::RETRY_AFTER,
                http::HeaderValue::from(secs),
            );
        }
        resp
    }
}
