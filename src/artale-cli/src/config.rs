//! Configuration management for artale CLI

use anyhow::{Context, Result};
use artale::history::{CookieJar, HistoryStore, MemoryStore, SqliteStore, StorageBackend};
use artale::ControllerOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset directory used when nothing else is configured
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub debounce_ms: Option<u64>,
    pub share_base_url: Option<String>,
    pub history_db: Option<PathBuf>,
    pub history_cookie_jar: Option<PathBuf>,
    pub cookie_ttl_days: Option<i64>,
    pub secure_cookies: Option<bool>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("artale");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Dataset directory: `flag` (which includes `ARTALE_DATA`), then config, then `./data`
    pub fn resolve_data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn controller_options(&self) -> ControllerOptions {
        let defaults = ControllerOptions::default();
        ControllerOptions {
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            debounce_ms: self.debounce_ms.unwrap_or(defaults.debounce_ms),
        }
    }

    pub fn share_base(&self) -> &str {
        self.share_base_url
            .as_deref()
            .unwrap_or(artale::share::DEFAULT_SHARE_BASE)
    }

    fn state_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("artale"))
    }

    pub fn history_db_path(&self) -> Option<PathBuf> {
        self.history_db
            .clone()
            .or_else(|| Self::state_dir().map(|dir| dir.join("history.db")))
    }

    pub fn cookie_jar_path(&self) -> Option<PathBuf> {
        self.history_cookie_jar
            .clone()
            .or_else(|| Self::state_dir().map(|dir| dir.join("cookies.txt")))
    }

    pub fn cookie_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(
            self.cookie_ttl_days
                .unwrap_or(artale::history::DEFAULT_COOKIE_TTL_DAYS),
        )
    }

    /// Open the history backends.
    ///
    /// A backend that cannot be opened is replaced by an in-memory one, so
    /// history degrades instead of failing the command.
    pub fn history_store(&self) -> HistoryStore {
        let primary: Box<dyn StorageBackend> = match self.history_db_path() {
            Some(path) => match open_sqlite(&path) {
                Ok(store) => Box::new(store),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "history database unavailable");
                    Box::new(MemoryStore::new())
                }
            },
            None => Box::new(MemoryStore::new()),
        };

        let secondary: Box<dyn StorageBackend> = match self.cookie_jar_path() {
            Some(path) => Box::new(
                CookieJar::new(path)
                    .with_ttl(self.cookie_ttl())
                    .with_secure(self.secure_cookies.unwrap_or(false)),
            ),
            None => Box::new(MemoryStore::new()),
        };

        HistoryStore::new(primary, secondary)
    }
}

fn open_sqlite(path: &Path) -> Result<SqliteStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    SqliteStore::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_ends_with_artale() {
        if let Ok(path) = Config::config_path() {
            assert!(path.ends_with("artale/config.toml"));
        }
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/artale")),
            batch_size: Some(24),
            secure_cookies: Some(true),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "batch_size = \"many\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_data_dir_precedence() {
        let config = Config {
            data_dir: Some(PathBuf::from("configured")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_data_dir(Some(PathBuf::from("flag"))),
            PathBuf::from("flag")
        );
        assert_eq!(config.resolve_data_dir(None), PathBuf::from("configured"));
        assert_eq!(
            Config::default().resolve_data_dir(None),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.controller_options(), ControllerOptions::default());
        assert_eq!(config.share_base(), "https://artale-drop.github.io/");
        assert_eq!(config.cookie_ttl(), chrono::Duration::days(30));
    }

    #[test]
    fn test_history_store_uses_configured_paths() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            history_db: Some(dir.path().join("state").join("history.db")),
            history_cookie_jar: Some(dir.path().join("cookies.txt")),
            ..Config::default()
        };
        let mut history = config.history_store();
        assert!(history.add_record("item", "sword"));

        let mut reopened = config.history_store();
        assert_eq!(reopened.get_records()[0].keyword, "sword");
        assert!(dir.path().join("cookies.txt").exists());
    }
}
