use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

/// Smallest scan batch the engine will issue.
///
/// A continuation page that starts inclusively at the marker spends its
/// first row on the already-returned entry; a batch of one would never move.
pub const MIN_FETCH_BATCH_SIZE: usize = 2;

pub const DEFAULT_FETCH_BATCH_SIZE: usize = 100;

/// What to do with an index row whose value fails to decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptEntryPolicy {
    /// Leave the row out of the listing entirely.
    #[default]
    Skip,
    /// Keep the row, with a default payload, and let it go through prefix
    /// and delimiter filtering like any other.
    IncludeWithDefaults,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown corrupt entry policy '{0}', expected 'skip' or 'include'")]
pub struct ParsePolicyError(String);

impl FromStr for CorruptEntryPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "include" | "include-with-defaults" => {
                Ok(Self::IncludeWithDefaults)
            }
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Process-wide listing configuration.
///
/// Built once at startup and shared read-only by every listing task.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub fetch_batch_size: usize,
    /// Upper bound applied to caller-supplied result caps. `None` uses the
    /// requested value verbatim.
    pub max_count_ceiling: Option<NonZeroUsize>,
    pub corrupt_entry_policy: CorruptEntryPolicy,
    /// Retry hint attached to responses refused because of shutdown.
    pub retry_after: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            fetch_batch_size: DEFAULT_FETCH_BATCH_SIZE,
            max_count_ceiling: None,
            corrupt_entry_policy: CorruptEntryPolicy::Skip,
            retry_after: Duration::from_secs(1),
        }
    }
}

impl ListingConfig {
    /// Set the scan batch size, raised to [`MIN_FETCH_BATCH_SIZE`] if lower
    pub fn with_fetch_batch_size(mut self, size: usize) -> Self {
        self.fetch_batch_size = size.max(MIN_FETCH_BATCH_SIZE);
        self
    }

    pub fn with_max_count_ceiling(mut self, ceiling: Option<NonZeroUsize>) -> Self {
        self.max_count_ceiling = ceiling;
        self
    }

    pub fn with_corrupt_entry_policy(mut self, policy: CorruptEntryPolicy) -> Self {
        self.corrupt_entry_policy = policy;
        self
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    pub fn effective_max_count(&self, requested: NonZeroUsize) -> NonZeroUsize {
        match self.max_count_ceiling {
            Some(ceiling) => requested.min(ceiling),
            None => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_is_clamped() {
        let config = ListingConfig::default().with_fetch_batch_size(1);
        assert_eq!(config.fetch_batch_size, MIN_FETCH_BATCH_SIZE);
        let config = ListingConfig::default().with_fetch_batch_size(7);
        assert_eq!(config.fetch_batch_size, 7);
    }

    #[test]
    fn ceiling_only_lowers() {
        let n = |v| NonZeroUsize::new(v).unwrap();
        let unclamped = ListingConfig::default();
        assert_eq!(unclamped.effective_max_count(n(5000)), n(5000));

        let clamped = ListingConfig::default().with_max_count_ceiling(Some(n(1000)));
        assert_eq!(clamped.effective_max_count(n(5000)), n(1000));
        assert_eq!(clamped.effective_max_count(n(10)), n(10));
    }

    #[test]
    fn parse_policy() {
        assert_eq!("skip".parse::<CorruptEntryPolicy>().unwrap(), CorruptEntryPolicy::Skip);
        assert_eq!(
            "Include".parse::<CorruptEntryPolicy>().unwrap(),
            CorruptEntryPolicy::IncludeWithDefaults
        );
        assert!("drop".parse::<CorruptEntryPolicy>().is_err());
    }
}
