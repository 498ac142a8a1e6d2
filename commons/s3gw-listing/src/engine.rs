use s3gw_index::IndexScanner;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::codec::EntryCodec;
use crate::config::ListingConfig;
use crate::metadata::ContainerMetadataLoader;
use crate::pipeline::ListingTask;
use crate::profile::ListingProfile;
use crate::types::ListingRequest;

/// Process-wide listing context: configuration, the index scanner and the
/// shutdown token. Cheap to clone; every call gets its own [`ListingTask`].
#[derive(Clone)]
pub struct ListingEngine {
    config: Arc<ListingConfig>,
    scanner: Arc<dyn IndexScanner>,
    shutdown: CancellationToken,
}

impl ListingEngine {
    pub fn new(
        config: ListingConfig,
        scanner: Arc<dyn IndexScanner>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config: Arc::new(config),
            scanner,
            shutdown,
        }
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn task<C: EntryCodec>(
        &self,
        profile: ListingProfile,
        loader: Arc<dyn ContainerMetadataLoader>,
        codec: C,
        request: ListingRequest,
    ) -> ListingTask<C> {
        ListingTask::new(
            profile,
            request,
            self.config.clone(),
            loader,
            self.scanner.clone(),
            codec,
            self.shutdown.child_token(),
        )
    }
}
