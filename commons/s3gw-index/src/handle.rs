use std::fmt;

/// 128-bit identifier of an ordered index.
///
/// The all-zero handle means "no index has been created", e.g. a bucket that
/// never had a multipart upload started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexHandle {
    hi: u64,
    lo: u64,
}

impl IndexHandle {
    pub const EMPTY: IndexHandle = IndexHandle { hi: 0, lo: 0 };

    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    pub fn is_empty(&self) -> bool {
        self.hi == 0 && self.lo == 0
    }
}

impl fmt::Display for IndexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}:{:x}", self.hi, self.lo)
    }
}
