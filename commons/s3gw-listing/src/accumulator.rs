use s3gw_index::IndexRow;
use tracing::{debug, error};

use crate::codec::EntryCodec;
use crate::config::CorruptEntryPolicy;
use crate::types::{Entry, ListingResult, ScanCursor};

/// Where a key lands once prefix and delimiter are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyClass {
    Admit,
    Rollup(String),
    Reject,
}

/// Prefix and delimiter of a request; empty strings mean "not set"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    prefix: String,
    delimiter: String,
}

impl KeyFilter {
    pub fn new(prefix: Option<&str>, delimiter: Option<&str>) -> Self {
        Self {
            prefix: prefix.unwrap_or_default().to_string(),
            delimiter: delimiter.unwrap_or_default().to_string(),
        }
    }

    pub fn classify(&self, key: &str) -> KeyClass {
        if !key.starts_with(&self.prefix) {
            return KeyClass::Reject;
        }
        if self.delimiter.is_empty() {
            return KeyClass::Admit;
        }
        let from = self.prefix.len();
        match key[from..].find(&self.delimiter) {
            Some(pos) => {
                let end = from + pos + self.delimiter.len();
                KeyClass::Rollup(key[..end].to_string())
            }
            None => KeyClass::Admit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDecision {
    ScanMore,
    Complete,
}

/// What one batch did to the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub decision: BatchDecision,
    pub rows: usize,
    pub corrupt: usize,
}

/// Folds successive scan batches into a [`ListingResult`]
#[derive(Debug)]
pub struct ListingAccumulator<R> {
    filter: KeyFilter,
    max_count: usize,
    batch_size: usize,
    policy: CorruptEntryPolicy,
    cursor: ScanCursor,
    result: ListingResult<R>,
}

impl<R: Clone + Default> ListingAccumulator<R> {
    pub fn new(
        filter: KeyFilter,
        cursor: ScanCursor,
        max_count: usize,
        batch_size: usize,
        policy: CorruptEntryPolicy,
    ) -> Self {
        Self {
            filter,
            max_count,
            batch_size,
            policy,
            cursor,
            result: ListingResult::default(),
        }
    }

    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn cap_reached(&self) -> bool {
        self.result.entries.len() >= self.max_count
    }

    /// Consume one batch, in scan order.
    ///
    /// Stops early once the cap is hit; the cursor always ends on the last
    /// row looked at.
    pub fn consume_batch<C>(&mut self, codec: &C, rows: Vec<IndexRow>) -> BatchReport
    where
        C: EntryCodec<Record = R>,
    {
        let fetched = rows.len();
        let mut remaining = fetched;
        let mut corrupt = 0;
        let mut first = true;

        for (key, raw) in rows {
            let record = match codec.decode(&raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    corrupt += 1;
                    error!(key = %key, error = %e, "failed to decode index entry");
                    None
                }
            };
            let secondary = record
                .as_ref()
                .and_then(|r| codec.secondary_id(r))
                .map(str::to_owned);

            if std::mem::take(&mut first)
                && self.cursor.is_boundary(&key, secondary.as_deref())
            {
                debug!(key = %key, "skipping row already returned by previous page");
                remaining -= 1;
                continue;
            }

            let entry = match (record, self.policy) {
                (Some(payload), _) => Some(Entry {
                    key: key.clone(),
                    secondary: secondary.clone(),
                    payload,
                    corrupt: false,
                }),
                (None, CorruptEntryPolicy::IncludeWithDefaults) => Some(Entry {
                    key: key.clone(),
                    secondary: None,
                    payload: R::default(),
                    corrupt: true,
                }),
                (None, CorruptEntryPolicy::Skip) => None,
            };

            if let Some(entry) = entry {
                match self.filter.classify(&key) {
                    KeyClass::Admit => self.result.entries.push(entry),
                    KeyClass::Rollup(prefix) => {
                        self.result.common_prefixes.insert(prefix);
                    }
                    KeyClass::Reject => {}
                }
            }

            remaining -= 1;
            if remaining == 0 || self.cap_reached() {
                self.cursor.advance(&key, secondary.as_deref());
                break;
            }
        }

        self.result.corrupt_entries += corrupt;
        let decision = if self.cap_reached() {
            self.result.truncated = true;
            self.result.next_marker = Some(self.cursor.marker());
            BatchDecision::Complete
        } else if fetched < self.batch_size {
            BatchDecision::Complete
        } else {
            self.cursor.continuation = true;
            BatchDecision::ScanMore
        };
        BatchReport {
            decision,
            rows: fetched,
            corrupt,
        }
    }

    /// Take the listing built so far, leaving an empty one behind
    pub fn finish(&mut self) -> ListingResult<R> {
        std::mem::take(&mut self.result)
    }
}
