use crate::{pattern::PatternError, pattern_id::PatternIdError, ports::StorageError};

/// Failure of a named controller operation.
///
/// Every variant leaves the in-memory state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnitError {
    /// Row delta outside `-1..=1`.
    InvalidDelta,
    InvalidPattern(PatternError),
    InvalidPatternId(PatternIdError),
    /// The default pattern cannot be deleted.
    ProtectedPattern,
    Storage(StorageError),
}

impl KnitError {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnitError::InvalidDelta => "row delta must be -1, 0 or 1",
            KnitError::InvalidPattern(err) => err.as_str(),
            KnitError::InvalidPatternId(err) => err.as_str(),
            KnitError::ProtectedPattern => "default pattern cannot be deleted",
            KnitError::Storage(err) => err.as_str(),
        }
    }
}

impl From<PatternError> for KnitError {
    fn from(err: PatternError) -> Self {
        KnitError::InvalidPattern(err)
    }
}

impl From<PatternIdError> for KnitError {
    fn from(err: PatternIdError) -> Self {
        KnitError::InvalidPatternId(err)
    }
}

impl From<StorageError> for KnitError {
    fn from(err: StorageError) -> Self {
        KnitError::Storage(err)
    }
}
