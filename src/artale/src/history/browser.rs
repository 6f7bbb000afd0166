//! Browser history backends: `localStorage` as primary, `document.cookie`
//! as secondary

use chrono::Duration;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Storage};

use super::backend::StorageBackend;
use super::cookie::{cookie_line, expired_cookie_line, find_cookie};
use super::{system_clock, Clock, DEFAULT_COOKIE_TTL_DAYS, HISTORY_KEY};
use crate::error::StorageError;

fn js_error(context: &str, e: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{}: {:?}", context, e))
}

/// `window.localStorage` under the history key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorageStore {
    /// Store for the current window; unusable (every call fails) when storage
    /// is disabled
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage unavailable".to_string()))
    }
}

impl StorageBackend for LocalStorageStore {
    fn name(&self) -> &'static str {
        "localStorage"
    }

    fn get(&self) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(HISTORY_KEY)
            .map_err(|e| js_error("localStorage read failed", e))
    }

    fn set(&mut self, blob: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(HISTORY_KEY, blob)
            .map_err(|e| js_error("localStorage write failed", e))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(HISTORY_KEY)
            .map_err(|e| js_error("localStorage delete failed", e))
    }
}

/// The history cookie on the current document.
///
/// Marked `secure` when the page is served over https.
pub struct DocumentCookieStore {
    document: Option<HtmlDocument>,
    ttl: Duration,
    secure: bool,
    clock: Clock,
}

impl std::fmt::Debug for DocumentCookieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCookieStore")
            .field("ttl", &self.ttl)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl Default for DocumentCookieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCookieStore {
    pub fn new() -> Self {
        let window = web_sys::window();
        let secure = window
            .as_ref()
            .and_then(|window| window.location().protocol().ok())
            .is_some_and(|protocol| protocol == "https:");
        let document = window
            .and_then(|window| window.document())
            .and_then(|document| document.dyn_into::<HtmlDocument>().ok());
        if document.is_none() {
            tracing::warn!("document.cookie unavailable");
        }
        Self {
            document,
            ttl: Duration::days(DEFAULT_COOKIE_TTL_DAYS),
            secure,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn document(&self) -> Result<&HtmlDocument, StorageError> {
        self.document
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("document.cookie unavailable".to_string()))
    }

    fn write(&self, line: &str) -> Result<(), StorageError> {
        self.document()?
            .set_cookie(line)
            .map_err(|e| js_error("cookie write failed", e))
    }
}

impl StorageBackend for DocumentCookieStore {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn get(&self) -> Result<Option<String>, StorageError> {
        let header = self
            .document()?
            .cookie()
            .map_err(|e| js_error("cookie read failed", e))?;
        find_cookie(&header)
    }

    fn set(&mut self, blob: &str) -> Result<(), StorageError> {
        let expires = (self.clock)() + self.ttl;
        self.write(&cookie_line(blob, expires, self.secure))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.write(&expired_cookie_line(self.secure))
    }
}
