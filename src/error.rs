use thiserror::Error;

/// Failures at the two asynchronous boundaries: platform lookups and storage.
///
/// None of these are fatal. Lookups fall back to placeholder values, reads
/// fall back to an empty log and writes are logged and dropped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HistoryError {
    /// The tab or group no longer exists
    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// A value crossing the JS boundary had an unexpected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
