//! Physical storage backends for the history blob

use crate::error::StorageError;

/// A single-slot store holding the serialized history list.
///
/// Implementations only move the raw JSON blob; parsing, validation and
/// failure recovery live in [`HistoryStore`](super::HistoryStore).
pub trait StorageBackend {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Stored blob, `None` when absent or expired
    fn get(&self) -> Result<Option<String>, StorageError>;

    fn set(&mut self, blob: &str) -> Result<(), StorageError>;

    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-process backend; contents are lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self) -> Result<Option<String>, StorageError> {
        Ok(self.blob.clone())
    }

    fn set(&mut self, blob: &str) -> Result<(), StorageError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.blob = None;
        Ok(())
    }
}
