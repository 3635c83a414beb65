use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A conditional write found a different revision than the one it expected.
    #[error("roster revision conflict (expected {expected:?})")]
    Conflict { expected: Option<String> },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a conflict error for the revision a writer expected to replace.
    pub fn conflict(expected: Option<&str>) -> Self {
        StorageError::Conflict {
            expected: expected.map(str::to_owned),
        }
    }

    /// Whether retrying the load-apply-replace cycle may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }
}
