//! Error types for the history storage backends

use thiserror::Error;

/// An error reading or writing the stored history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// An error accessing the underlying storage
    #[error("storage error: {0}")]
    Storage(String),
    /// The stored history could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[allow(clippy::needless_pass_by_value)]
impl HistoryError {
    /// Create a storage error
    pub fn storage<T: ToString>(msg: T) -> Self {
        Self::Storage(msg.to_string())
    }

    /// Create a serialization error
    pub fn serialization<T: ToString>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }
}
