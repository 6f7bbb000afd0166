//! Error types shared across the crate

use thiserror::Error;

/// A required dataset could not be read or parsed.
///
/// Fatal to initialization: callers show the message in place of results and
/// render nothing else.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("failed to read {file}: {source}")]
    Io {
        file: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A history storage backend failed.
///
/// Never escapes [`crate::HistoryStore`]; backends return it and the store
/// degrades to an empty read or a dropped write.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[cfg(feature = "db")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed history record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

/// A history record type other than `monster` or `item`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown history record type: {0}")]
pub struct UnknownRecordType(pub String);
