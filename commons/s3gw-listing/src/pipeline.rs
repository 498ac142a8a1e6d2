use s3gw_index::{IndexHandle, IndexScanner, ScanError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::accumulator::{BatchDecision, KeyFilter, ListingAccumulator};
use crate::codec::EntryCodec;
use crate::config::{ListingConfig, MIN_FETCH_BATCH_SIZE};
use crate::events;
use crate::metadata::{ContainerMetadataLoader, MetadataLoad};
use crate::profile::{AbsentContainer, ListingProfile};
use crate::sink::{ListingOutcome, ResponseSink};
use crate::types::{ListingRequest, ScanCursor};

/// Lifecycle of a listing task.
///
/// `Init -> LoadingMetadata -> Scanning* -> Responding -> Done`; any failure
/// or shutdown jumps straight to `Responding`.
#[derive(Debug)]
pub enum TaskState<R> {
    Init,
    LoadingMetadata,
    Scanning(IndexHandle),
    Responding(ListingOutcome<R>),
    Done,
}

impl<R> TaskState<R> {
    pub fn name(&self) -> &'static str {
        match self {
            TaskState::Init => "init",
            TaskState::LoadingMetadata => "loading_metadata",
            TaskState::Scanning(_) => "scanning",
            TaskState::Responding(_) => "responding",
            TaskState::Done => "done",
        }
    }
}

/// One listing call, driven from metadata lookup to its single response.
///
/// The task owns all per-call state and is consumed by [`ListingTask::run`].
pub struct ListingTask<C: EntryCodec> {
    profile: ListingProfile,
    request: ListingRequest,
    loader: Arc<dyn ContainerMetadataLoader>,
    scanner: Arc<dyn IndexScanner>,
    codec: C,
    shutdown: CancellationToken,
    retry_after: Duration,
    accumulator: ListingAccumulator<C::Record>,
    state: TaskState<C::Record>,
    scans: usize,
}

impl<C: EntryCodec> ListingTask<C> {
    pub fn new(
        profile: ListingProfile,
        request: ListingRequest,
        config: Arc<ListingConfig>,
        loader: Arc<dyn ContainerMetadataLoader>,
        scanner: Arc<dyn IndexScanner>,
        codec: C,
        shutdown: CancellationToken,
    ) -> Self {
        let max_count = if profile.unbounded {
            usize::MAX
        } else {
            config.effective_max_count(request.max_count).get()
        };
        let accumulator = ListingAccumulator::new(
            KeyFilter::new(request.prefix.as_deref(), request.delimiter.as_deref()),
            ScanCursor::from_marker(request.marker.as_ref()),
            max_count,
            config.fetch_batch_size.max(MIN_FETCH_BATCH_SIZE),
            profile.effective_corrupt_policy(config.corrupt_entry_policy),
        );
        Self {
            profile,
            request,
            loader,
            scanner,
            codec,
            shutdown,
            retry_after: config.retry_after,
            accumulator,
            state: TaskState::Init,
            scans: 0,
        }
    }

    /// Drive the task to completion, sending exactly one outcome to `sink`
    pub async fn run<S>(mut self, sink: S)
    where
        S: ResponseSink<C::Record>,
    {
        loop {
            let state = std::mem::replace(&mut self.state, TaskState::Done);
            let next = match state {
                TaskState::Init => self.start(),
                TaskState::LoadingMetadata => self.load_metadata().await,
                TaskState::Scanning(index) => self.scan(index).await,
                TaskState::Responding(outcome) => {
                    debug!(
                        listing = self.profile.name,
                        container = %self.request.container,
                        success = outcome.is_success(),
                        "sending listing response"
                    );
                    sink.respond(outcome).await;
                    TaskState::Done
                }
                TaskState::Done => break,
            };
            debug!(
                listing = self.profile.name,
                container = %self.request.container,
                state = next.name(),
                "listing task transition"
            );
            self.state = next;
        }
        debug!(
            listing = self.profile.name,
            container = %self.request.container,
            scans = self.scans,
            "listing task done"
        );
    }

    /// `Responding` with the shutdown outcome, if shutdown was requested
    fn interrupted(&self) -> Option<TaskState<C::Record>> {
        if !self.shutdown.is_cancelled() {
            return None;
        }
        info!(
            listing = self.profile.name,
            container = %self.request.container,
            "shutting down, refusing listing"
        );
        Some(TaskState::Responding(ListingOutcome::ServiceUnavailable {
            retry_after: self.retry_after,
        }))
    }

    fn start(&self) -> TaskState<C::Record> {
        self.interrupted().unwrap_or(TaskState::LoadingMetadata)
    }

    fn respond_success(&mut self) -> TaskState<C::Record> {
        TaskState::Responding(ListingOutcome::Success(self.accumulator.finish()))
    }

    async fn load_metadata(&mut self) -> TaskState<C::Record> {
        if let Some(state) = self.interrupted() {
            return state;
        }
        let load = self.loader.load(&self.request.container).await;
        if let Some(state) = self.interrupted() {
            return state;
        }
        match load {
            MetadataLoad::Present(metadata) => {
                let index = metadata.index(self.profile.index_role);
                if index.is_empty() {
                    debug!(
                        container = %self.request.container,
                        role = ?self.profile.index_role,
                        "no index created yet, listing is empty"
                    );
                    self.respond_success()
                } else {
                    TaskState::Scanning(index)
                }
            }
            MetadataLoad::Absent => match self.profile.absent_container {
                AbsentContainer::NotFound => {
                    debug!(container = %self.request.container, "container not found");
                    TaskState::Responding(ListingOutcome::NotFound)
                }
                AbsentContainer::EmptySuccess => self.respond_success(),
            },
            MetadataLoad::Failed(reason) => {
                error!(
                    container = %self.request.container,
                    reason = %reason,
                    "failed to load container metadata"
                );
                TaskState::Responding(ListingOutcome::InternalError(reason))
            }
        }
    }

    async fn scan(&mut self, index: IndexHandle) -> TaskState<C::Record> {
        if let Some(state) = self.interrupted() {
            return state;
        }
        self.scans += 1;
        let batch = self
            .scanner
            .scan_batch(
                &index,
                self.accumulator.cursor().start_bound(),
                self.accumulator.batch_size(),
            )
            .await;
        if let Some(state) = self.interrupted() {
            debug!(index = %index, "discarding in-flight batch");
            return state;
        }
        match batch {
            Ok(rows) => {
                let report = self.accumulator.consume_batch(&self.codec, rows);
                debug!(
                    index = %index,
                    rows = report.rows,
                    decision = ?report.decision,
                    "consumed listing batch"
                );
                if report.corrupt > 0 {
                    events::metadata_corrupted(self.profile.name, &index, report.corrupt);
                }
                match report.decision {
                    BatchDecision::ScanMore => TaskState::Scanning(index),
                    BatchDecision::Complete => self.respond_success(),
                }
            }
            Err(ScanError::NoMatchingEntries) => {
                debug!(index = %index, "no more entries");
                self.respond_success()
            }
            Err(e) => {
                error!(index = %index, error = %e, "failed to fetch listing batch");
                TaskState::Responding(ListingOutcome::InternalError(e.to_string()))
            }
        }
    }
}
