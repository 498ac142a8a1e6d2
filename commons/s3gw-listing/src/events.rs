//! Operational events raised alongside a listing.
//!
//! These go to the log with an `event_code` field so they can be picked out
//! of the regular stream; they never change the outcome of a call.

use s3gw_index::IndexHandle;
use tracing::error;

pub const METADATA_CORRUPTED: &str = "METADATA_CORRUPTED";

/// One or more rows of a batch failed to decode
pub fn metadata_corrupted(listing: &str, index: &IndexHandle, count: usize) {
    error!(
        event_code = METADATA_CORRUPTED,
        listing,
        index = %index,
        count,
        "index metadata corrupted: entry value failed to decode"
    );
}
