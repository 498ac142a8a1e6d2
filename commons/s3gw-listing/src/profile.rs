use crate::config::CorruptEntryPolicy;
use crate::metadata::IndexRole;

/// How a listing treats a container whose metadata is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentContainer {
    NotFound,
    EmptySuccess,
}

/// Static description of one kind of listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingProfile {
    pub name: &'static str,
    pub index_role: IndexRole,
    pub absent_container: AbsentContainer,
    /// Ignore the requested cap and run to the end of the index.
    pub unbounded: bool,
    /// Policy forced for this listing; `None` follows [`ListingConfig`].
    ///
    /// [`ListingConfig`]: crate::config::ListingConfig
    pub corrupt_entry_policy: Option<CorruptEntryPolicy>,
}

impl ListingProfile {
    pub const OBJECTS: ListingProfile = ListingProfile {
        name: "objects",
        index_role: IndexRole::Objects,
        absent_container: AbsentContainer::NotFound,
        unbounded: false,
        corrupt_entry_policy: None,
    };

    pub const MULTIPART_UPLOADS: ListingProfile = ListingProfile {
        name: "multipart_uploads",
        index_role: IndexRole::MultipartUploads,
        absent_container: AbsentContainer::NotFound,
        unbounded: false,
        corrupt_entry_policy: None,
    };

    pub const BUCKETS: ListingProfile = ListingProfile {
        name: "buckets",
        index_role: IndexRole::Buckets,
        absent_container: AbsentContainer::EmptySuccess,
        unbounded: true,
        // a bucket row that does not decode is never listed
        corrupt_entry_policy: Some(CorruptEntryPolicy::Skip),
    };

    /// Corrupt entry handling for this listing under `configured`
    pub fn effective_corrupt_policy(&self, configured: CorruptEntryPolicy) -> CorruptEntryPolicy {
        self.corrupt_entry_policy.unwrap_or(configured)
    }
}
