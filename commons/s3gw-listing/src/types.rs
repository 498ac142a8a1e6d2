use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::ops::Bound;

pub const DEFAULT_MAX_COUNT: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Continuation marker: where the next page resumes.
///
/// `secondary` disambiguates rows sharing a primary key, such as several
/// in-progress uploads of the same object name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marker {
    pub key: String,
    pub secondary: Option<String>,
}

impl Marker {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }
}

/// One listing call, already parsed and validated by the protocol layer
#[derive(Debug, Clone)]
pub struct ListingRequest {
    pub container: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub marker: Option<Marker>,
    pub max_count: NonZeroUsize,
}

impl ListingRequest {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            prefix: None,
            delimiter: None,
            marker: None,
            max_count: DEFAULT_MAX_COUNT,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Set the result cap; `None` keeps [`DEFAULT_MAX_COUNT`]
    pub fn with_max_count(mut self, max_count: Option<NonZeroUsize>) -> Self {
        self.max_count = max_count.unwrap_or(DEFAULT_MAX_COUNT);
        self
    }
}

/// A decoded index row admitted into a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<R> {
    pub key: String,
    pub secondary: Option<String>,
    pub payload: R,
    /// The stored value failed to decode and `payload` holds defaults.
    pub corrupt: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingResult<R> {
    pub entries: Vec<Entry<R>>,
    pub common_prefixes: BTreeSet<String>,
    pub truncated: bool,
    /// Present exactly when `truncated` is set.
    pub next_marker: Option<Marker>,
    /// Rows whose value failed to decode, across all batches.
    pub corrupt_entries: usize,
}

impl<R> Default for ListingResult<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            common_prefixes: BTreeSet::new(),
            truncated: false,
            next_marker: None,
            corrupt_entries: 0,
        }
    }
}

impl<R> ListingResult<R> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.common_prefixes.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }
}

/// Position of a listing within its index, threaded through scan calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCursor {
    pub last_key: String,
    pub last_secondary: String,
    /// The next batch continues an earlier page or batch.
    pub continuation: bool,
}

impl ScanCursor {
    pub fn from_marker(marker: Option<&Marker>) -> Self {
        match marker {
            Some(marker) => Self {
                last_key: marker.key.clone(),
                last_secondary: marker.secondary.clone().unwrap_or_default(),
                continuation: !marker.key.is_empty(),
            },
            None => Self::default(),
        }
    }

    /// Where the next scan starts.
    ///
    /// With a secondary marker the scan includes the marker row, which is
    /// then dropped by [`ScanCursor::is_boundary`]. Without one the marker
    /// row is excluded at the index.
    pub fn start_bound(&self) -> Bound<&str> {
        if self.last_key.is_empty() {
            Bound::Unbounded
        } else if self.last_secondary.is_empty() {
            Bound::Excluded(self.last_key.as_str())
        } else {
            Bound::Included(self.last_key.as_str())
        }
    }

    pub fn dedups_boundary(&self) -> bool {
        self.continuation
            && !self.last_key.is_empty()
            && !self.last_secondary.is_empty()
    }

    /// Whether a row is the one the previous page ended on
    pub fn is_boundary(&self, key: &str, secondary: Option<&str>) -> bool {
        self.dedups_boundary()
            && self.last_key == key
            && secondary == Some(self.last_secondary.as_str())
    }

    pub fn advance(&mut self, key: &str, secondary: Option<&str>) {
        self.last_key.clear();
        self.last_key.push_str(key);
        self.last_secondary.clear();
        self.last_secondary.push_str(secondary.unwrap_or_default());
    }

    pub fn marker(&self) -> Marker {
        Marker {
            key: self.last_key.clone(),
            secondary: (!self.last_secondary.is_empty())
                .then(|| self.last_secondary.clone()),
        }
    }
}
