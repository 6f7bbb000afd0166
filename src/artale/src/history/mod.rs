//! Search history
//!
//! [`HistoryStore`] keeps a capped, most-recent-first list of confirmed
//! searches in two backends. The primary is read first; when it is empty the
//! secondary is consulted and, if it has records, copied back into the
//! primary. Every backend failure is logged and swallowed: reads degrade to
//! an empty list and writes are dropped.

mod backend;
#[cfg(feature = "wasm")]
mod browser;
mod cookie;
#[cfg(feature = "db")]
mod sqlite;

pub use backend::{MemoryStore, StorageBackend};
#[cfg(feature = "wasm")]
pub use browser::{DocumentCookieStore, LocalStorageStore};
pub use cookie::{CookieJar, COOKIE_NAME, DEFAULT_COOKIE_TTL_DAYS};
#[cfg(feature = "db")]
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::UnknownRecordType;

/// Key of the history blob in key/value stores
pub const HISTORY_KEY: &str = "search_history";

/// Most records kept after any write
pub const MAX_RECORDS: usize = 100;

/// Longest accepted keyword, in characters
pub const MAX_KEYWORD_LEN: usize = 50;

/// Source of "now" for timestamps and cookie expiry
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// What the recorded search found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Monster,
    Item,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Monster => "monster",
            RecordType::Item => "item",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monster" => Ok(RecordType::Monster),
            "item" => Ok(RecordType::Item),
            other => Err(UnknownRecordType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "type")]
    pub kind: RecordType,
    pub keyword: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl HistoryRecord {
    /// Record time in UTC, `None` for out-of-range timestamps
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

pub struct HistoryStore {
    primary: Box<dyn StorageBackend>,
    secondary: Box<dyn StorageBackend>,
    clock: Clock,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("primary", &self.primary.name())
            .field("secondary", &self.secondary.name())
            .finish()
    }
}

impl HistoryStore {
    pub fn new(primary: Box<dyn StorageBackend>, secondary: Box<dyn StorageBackend>) -> Self {
        Self {
            primary,
            secondary,
            clock: system_clock(),
        }
    }

    /// Both backends in memory; history lasts as long as the store
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Records, most recent first
    pub fn get_records(&mut self) -> Vec<HistoryRecord> {
        let records = read_backend(self.primary.as_ref());
        if !records.is_empty() {
            return records;
        }

        let records = read_backend(self.secondary.as_ref());
        if !records.is_empty() {
            tracing::debug!(
                count = records.len(),
                from = self.secondary.name(),
                to = self.primary.name(),
                "promoting history records"
            );
            write_backend(self.primary.as_mut(), &records);
        }
        records
    }

    /// Record a search by type tag.
    ///
    /// Unknown types and empty or over-long keywords are ignored. Returns
    /// whether the record was accepted.
    pub fn add_record(&mut self, kind: &str, keyword: &str) -> bool {
        match kind.parse::<RecordType>() {
            Ok(kind) => self.record(kind, keyword),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring history record");
                false
            }
        }
    }

    /// Move `(kind, keyword)` to the front with a fresh timestamp
    pub fn record(&mut self, kind: RecordType, keyword: &str) -> bool {
        if keyword.is_empty() || keyword.chars().count() > MAX_KEYWORD_LEN {
            tracing::debug!(keyword = %keyword, "ignoring history keyword");
            return false;
        }

        let mut records = self.get_records();
        records.retain(|r| !(r.kind == kind && r.keyword == keyword));
        records.insert(
            0,
            HistoryRecord {
                kind,
                keyword: keyword.to_string(),
                timestamp: (self.clock)().timestamp_millis(),
            },
        );
        records.truncate(MAX_RECORDS);

        write_backend(self.primary.as_mut(), &records);
        write_backend(self.secondary.as_mut(), &records);
        true
    }

    /// Empty both backends; a failing backend does not stop the other
    pub fn clear_history(&mut self) {
        for backend in [self.primary.as_mut(), self.secondary.as_mut()] {
            if let Err(e) = backend.clear() {
                tracing::warn!(backend = backend.name(), error = %e, "failed to clear history");
            }
        }
    }
}

fn read_backend(backend: &dyn StorageBackend) -> Vec<HistoryRecord> {
    let blob = match backend.get() {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::debug!(backend = backend.name(), error = %e, "history read failed");
            return Vec::new();
        }
    };

    match serde_json::from_str(&blob) {
        Ok(records) => records,
        Err(e) => {
            tracing::debug!(backend = backend.name(), error = %e, "malformed history blob");
            Vec::new()
        }
    }
}

fn write_backend(backend: &mut dyn StorageBackend, records: &[HistoryRecord]) {
    let result = serde_json::to_string(records)
        .map_err(Into::into)
        .and_then(|blob| backend.set(&blob));
    if let Err(e) = result {
        tracing::warn!(backend = backend.name(), error = %e, "history write failed");
    }
}
