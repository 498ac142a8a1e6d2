use thiserror::Error;

/// Failure of a single scan call against an ordered index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The index, or the requested range within it, holds no rows.
    #[error("No matching entries")]
    NoMatchingEntries,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl ScanError {
    pub fn backend<T: ToString>(msg: T) -> Self {
        Self::Backend(msg.to_string())
    }

    pub fn invalid_operation<T: ToString>(msg: T) -> Self {
        Self::InvalidOperation(msg.to_string())
    }

    pub fn is_no_matching_entries(&self) -> bool {
        matches!(self, Self::NoMatchingEntries)
    }
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
