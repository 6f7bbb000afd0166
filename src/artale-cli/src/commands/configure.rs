//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up artale CLI defaults.

use crate::config::Config;
use anyhow::{bail, Result};

/// Settings given on the command line; `None` leaves the value unchanged
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub data_dir: Option<std::path::PathBuf>,
    pub batch_size: Option<usize>,
    pub debounce_ms: Option<u64>,
    pub share_base_url: Option<String>,
    pub history_db: Option<std::path::PathBuf>,
    pub history_cookie_jar: Option<std::path::PathBuf>,
    pub cookie_ttl_days: Option<i64>,
    pub secure_cookies: Option<bool>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        self.data_dir.is_none()
            && self.batch_size.is_none()
            && self.debounce_ms.is_none()
            && self.share_base_url.is_none()
            && self.history_db.is_none()
            && self.history_cookie_jar.is_none()
            && self.cookie_ttl_days.is_none()
            && self.secure_cookies.is_none()
    }

    /// Merge into `config`, rejecting values the tool cannot use
    fn apply(self, config: &mut Config) -> Result<()> {
        if self.batch_size == Some(0) {
            bail!("batch size must be at least 1");
        }
        if self.cookie_ttl_days.is_some_and(|days| days <= 0) {
            bail!("cookie lifetime must be at least 1 day");
        }
        if let Some(base) = &self.share_base_url {
            artale::share_url(base, "")
                .map_err(|e| anyhow::anyhow!("invalid share base URL '{}': {}", base, e))?;
        }

        config.data_dir = self.data_dir.or(config.data_dir.take());
        config.batch_size = self.batch_size.or(config.batch_size);
        config.debounce_ms = self.debounce_ms.or(config.debounce_ms);
        config.share_base_url = self.share_base_url.or(config.share_base_url.take());
        config.history_db = self.history_db.or(config.history_db.take());
        config.history_cookie_jar = self.history_cookie_jar.or(config.history_cookie_jar.take());
        config.cookie_ttl_days = self.cookie_ttl_days.or(config.cookie_ttl_days);
        config.secure_cookies = self.secure_cookies.or(config.secure_cookies);
        Ok(())
    }
}

/// Handle the configure command
///
/// # Arguments
/// * `update` - Settings to change
/// * `show` - If true, show current configuration
pub fn handle(update: ConfigUpdate, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if update.is_empty() {
        show_usage();
        return Ok(());
    }

    update.apply(&mut config)?;
    config.save()?;

    println!("Configuration updated");
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    let options = config.controller_options();
    println!(
        "Data directory: {}",
        config.resolve_data_dir(None).display()
    );
    println!("Batch size: {}", options.batch_size);
    println!("Debounce: {} ms", options.debounce_ms);
    println!("Share base URL: {}", config.share_base());
    match config.history_db_path() {
        Some(path) => println!("History database: {}", path.display()),
        None => println!("History database: (memory only)"),
    }
    match config.cookie_jar_path() {
        Some(path) => println!("History cookie: {}", path.display()),
        None => println!("History cookie: (memory only)"),
    }
    println!(
        "Cookie lifetime: {} days{}",
        config.cookie_ttl().num_days(),
        if config.secure_cookies.unwrap_or(false) {
            ", secure"
        } else {
            ""
        }
    );

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: artale configure --data-dir PATH");
    println!("   or: artale configure --batch-size 24 --debounce-ms 300");
    println!("   or: artale configure --show");
    println!();
    println!("Note: ARTALE_DATA and --data override the configured data directory.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
    }

    #[test]
    fn test_apply_merges() {
        let mut config = Config {
            data_dir: Some(PathBuf::from("old")),
            debounce_ms: Some(300),
            ..Config::default()
        };
        ConfigUpdate {
            batch_size: Some(24),
            ..ConfigUpdate::default()
        }
        .apply(&mut config)
        .unwrap();
        assert_eq!(config.batch_size, Some(24));
        assert_eq!(config.debounce_ms, Some(300));
        assert_eq!(config.data_dir, Some(PathBuf::from("old")));
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();
        let zero = ConfigUpdate {
            batch_size: Some(0),
            ..ConfigUpdate::default()
        };
        assert!(zero.apply(&mut config).is_err());

        let bad_url = ConfigUpdate {
            share_base_url: Some("not a url".to_string()),
            ..ConfigUpdate::default()
        };
        assert!(bad_url.apply(&mut config).is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_update() {
        assert!(ConfigUpdate::default().is_empty());
        assert!(!ConfigUpdate {
            secure_cookies: Some(false),
            ..ConfigUpdate::default()
        }
        .is_empty());
    }
}
