use std::fmt;

use super::item::PrimaryKey;

/// Errors that can occur during item store operations.
#[derive(Debug)]
pub enum StoreError {
    /// A conditional put was rejected.
    ConditionFailed(PrimaryKey),
    /// The item is missing its key attributes.
    InvalidItem(String),
    /// The store could not be reached or did not answer in time.
    Unavailable(String),
    /// An I/O error occurred while reading or writing a snapshot.
    Io(std::io::Error),
    /// A snapshot could not be encoded or decoded.
    Serialization(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConditionFailed(key) => write!(f, "condition failed for item {key}"),
            Self::InvalidItem(msg) => write!(f, "invalid item: {msg}"),
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            Self::Io(err) => write!(f, "store IO error: {err}"),
            Self::Serialization(err) => write!(f, "snapshot serialization error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}
