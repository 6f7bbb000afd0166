//! Cookie-style secondary history store
//!
//! The blob is kept as one `Set-Cookie`-shaped line in a file:
//!
//! ```text
//! search_history_cookie=<percent-encoded JSON>; expires=<HTTP date>; path=/; SameSite=Strict
//! ```
//!
//! A cookie whose `expires` date has passed reads as absent.

use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::backend::StorageBackend;
use super::{system_clock, Clock};
use crate::error::StorageError;

pub const COOKIE_NAME: &str = "search_history_cookie";

pub const DEFAULT_COOKIE_TTL_DAYS: i64 = 30;

/// HTTP date format used for the `expires` attribute
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub struct CookieJar {
    path: PathBuf,
    ttl: Duration,
    secure: bool,
    clock: Clock,
}

impl std::fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieJar")
            .field("path", &self.path)
            .field("ttl", &self.ttl)
            .field("secure", &self.secure)
            .finish()
    }
}

impl CookieJar {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            ttl: Duration::days(DEFAULT_COOKIE_TTL_DAYS),
            secure: false,
            clock: system_clock(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Mark the cookie `secure`, for encrypted transports
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cookie_line(&self, value: &str, expires: DateTime<Utc>) -> String {
        cookie_line(value, expires, self.secure)
    }

    fn write_line(&self, line: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, line)?;
        Ok(())
    }
}

/// `Set-Cookie`-shaped line for the history cookie
pub(crate) fn cookie_line(value: &str, expires: DateTime<Utc>, secure: bool) -> String {
    let mut line = format!(
        "{}={}; expires={}; path=/; SameSite=Strict",
        COOKIE_NAME,
        urlencoding::encode(value),
        expires.format(EXPIRES_FORMAT)
    );
    if secure {
        line.push_str("; secure");
    }
    line
}

/// Expired line that removes the history cookie
pub(crate) fn expired_cookie_line(secure: bool) -> String {
    cookie_line("", DateTime::<Utc>::UNIX_EPOCH, secure)
}

/// History cookie value from a `name=value; name=value` cookie header.
///
/// Browsers drop expired cookies themselves, so no expiry is checked here.
#[cfg_attr(not(feature = "wasm"), allow(dead_code))]
pub(crate) fn find_cookie(header: &str) -> Result<Option<String>, StorageError> {
    let Some(value) = header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(COOKIE_NAME)?.strip_prefix('='))
        .filter(|value| !value.is_empty())
    else {
        return Ok(None);
    };
    let decoded = urlencoding::decode(value)
        .map_err(|e| StorageError::Unavailable(format!("bad cookie encoding: {}", e)))?;
    Ok(Some(decoded.into_owned()))
}

/// Value of the history cookie in `line` unless it has expired at `now`
fn parse_cookie(line: &str, now: DateTime<Utc>) -> Result<Option<String>, StorageError> {
    let mut attributes = line.trim().split(';').map(str::trim);

    let Some(value) = attributes
        .next()
        .and_then(|pair| pair.strip_prefix(COOKIE_NAME))
        .and_then(|rest| rest.strip_prefix('='))
    else {
        return Ok(None);
    };

    for attribute in attributes {
        let Some((key, date)) = attribute.split_once('=') else {
            continue;
        };
        if !key.eq_ignore_ascii_case("expires") {
            continue;
        }
        let expires = DateTime::parse_from_rfc2822(date)
            .map_err(|e| StorageError::Unavailable(format!("bad cookie expiry {:?}: {}", date, e)))?;
        if expires <= now {
            return Ok(None);
        }
    }

    if value.is_empty() {
        return Ok(None);
    }
    let decoded = urlencoding::decode(value)
        .map_err(|e| StorageError::Unavailable(format!("bad cookie encoding: {}", e)))?;
    Ok(Some(decoded.into_owned()))
}

impl StorageBackend for CookieJar {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn get(&self) -> Result<Option<String>, StorageError> {
        let line = match fs::read_to_string(&self.path) {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        parse_cookie(&line, (self.clock)())
    }

    fn set(&mut self, blob: &str) -> Result<(), StorageError> {
        let expires = (self.clock)() + self.ttl;
        self.write_line(&self.cookie_line(blob, expires))
    }

    /// Overwrites the cookie with an already-expired one
    fn clear(&mut self) -> Result<(), StorageError> {
        self.write_line(&expired_cookie_line(self.secure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn fixed_clock(millis: Arc<AtomicI64>) -> Clock {
        Arc::new(move || {
            Utc.timestamp_millis_opt(millis.load(Ordering::SeqCst))
                .single()
                .unwrap()
        })
    }

    #[test]
    fn test_cookie_line_format() {
        let dir = TempDir::new().unwrap();
        let now = Arc::new(AtomicI64::new(0));
        let mut jar = CookieJar::new(dir.path().join("cookie.txt"))
            .with_ttl(Duration::days(1))
            .with_clock(fixed_clock(now));
        jar.set(r#"[{"keyword":"a b"}]"#).unwrap();

        let line = fs::read_to_string(jar.path()).unwrap();
        assert_eq!(
            line,
            "search_history_cookie=%5B%7B%22keyword%22%3A%22a%20b%22%7D%5D; \
             expires=Fri, 02 Jan 1970 00:00:00 GMT; path=/; SameSite=Strict"
        );
        assert_eq!(jar.get().unwrap().as_deref(), Some(r#"[{"keyword":"a b"}]"#));
    }

    #[test]
    fn test_secure_flag() {
        let dir = TempDir::new().unwrap();
        let mut jar = CookieJar::new(dir.path().join("cookie.txt")).with_secure(true);
        jar.set("[]").unwrap();
        let line = fs::read_to_string(jar.path()).unwrap();
        assert!(line.ends_with("; SameSite=Strict; secure"));
    }

    #[test]
    fn test_expired_cookie_reads_absent() {
        let dir = TempDir::new().unwrap();
        let now = Arc::new(AtomicI64::new(1_700_000_000_000));
        let mut jar = CookieJar::new(dir.path().join("cookie.txt"))
            .with_clock(fixed_clock(Arc::clone(&now)));
        jar.set("[]").unwrap();
        assert!(jar.get().unwrap().is_some());

        let thirty_days = Duration::days(DEFAULT_COOKIE_TTL_DAYS).num_milliseconds();
        now.fetch_add(thirty_days, Ordering::SeqCst);
        assert!(jar.get().unwrap().is_none());
    }

    #[test]
    fn test_missing_file_reads_absent() {
        let dir = TempDir::new().unwrap();
        let jar = CookieJar::new(dir.path().join("nested").join("cookie.txt"));
        assert!(jar.get().unwrap().is_none());
    }

    #[test]
    fn test_clear_writes_expired_cookie() {
        let dir = TempDir::new().unwrap();
        let mut jar = CookieJar::new(dir.path().join("nested").join("cookie.txt"));
        jar.set("[]").unwrap();
        jar.clear().unwrap();
        let line = fs::read_to_string(jar.path()).unwrap();
        assert!(line.contains("expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(jar.get().unwrap().is_none());
    }

    #[test]
    fn test_foreign_cookie_is_ignored() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(parse_cookie("other=1; path=/", now).unwrap().is_none());
        assert!(parse_cookie("garbage", now).unwrap().is_none());
        assert!(parse_cookie("search_history_cookie=x; expires=soon", now).is_err());
    }

    #[test]
    fn test_find_cookie_in_header() {
        let header = "theme=dark; search_history_cookie=%5B%5D; other=1";
        assert_eq!(find_cookie(header).unwrap().as_deref(), Some("[]"));
        assert!(find_cookie("theme=dark").unwrap().is_none());
        assert!(find_cookie("search_history_cookie=").unwrap().is_none());
        assert!(find_cookie("").unwrap().is_none());
    }

    #[test]
    fn test_expired_cookie_line() {
        assert_eq!(
            expired_cookie_line(true),
            "search_history_cookie=; expires=Thu, 01 Jan 1970 00:00:00 GMT; \
             path=/; SameSite=Strict; secure"
        );
    }
}
