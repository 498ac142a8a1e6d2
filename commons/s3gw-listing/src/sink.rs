use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::types::ListingResult;

/// Final result of one listing call
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome<R> {
    Success(ListingResult<R>),
    NotFound,
    /// Refused because the process is shutting down.
    ServiceUnavailable { retry_after: Duration },
    InternalError(String),
}

impl<R> ListingOutcome<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Receives the single outcome of a listing task
#[async_trait]
pub trait ResponseSink<R: Send + 'static>: Send + Sync {
    async fn respond(&self, outcome: ListingOutcome<R>);
}

/// Sink that forwards the outcome over a one-slot channel
#[derive(Debug, Clone)]
pub struct ChannelSink<R> {
    tx: flume::Sender<ListingOutcome<R>>,
}

pub fn response_channel<R>() -> (ChannelSink<R>, flume::Receiver<ListingOutcome<R>>) {
    let (tx, rx) = flume::bounded(1);
    (ChannelSink { tx }, rx)
}

#[async_trait]
impl<R: Send + 'static> ResponseSink<R> for ChannelSink<R> {
    async fn respond(&self, outcome: ListingOutcome<R>) {
        if self.tx.send_async(outcome).await.is_err() {
            warn!("listing response dropped: receiver is gone");
        }
    }
}
