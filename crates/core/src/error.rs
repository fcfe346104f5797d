use thiserror::Error;

/// Rejected task text. No state changes when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a task!")]
    Empty,
    #[error("Task is too long! Maximum {max} characters.")]
    TooLong { len: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("saved tasks could not be parsed: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("entry '{key}' is not valid UTF-8")]
    NotUtf8 {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("failed to read entry '{key}'")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write entry '{key}'")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StorageError {
    /// The entry exists but its contents can't be decoded.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt(_) | StorageError::NotUtf8 { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unknown filter '{0}': expected all|active|completed")]
    Invalid(String),
}

/// Outcome of a failed Task Store mutation.
///
/// `Storage` means the in-memory change was applied but could not be persisted.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
