//! Share link command handler

use anyhow::{Context, Result};

use crate::config::Config;

/// Handle the share command
pub fn handle(config: &Config, keyword: &[String], base: Option<&str>) -> Result<()> {
    let base = base.unwrap_or_else(|| config.share_base());
    let url = artale::share_url(base, &keyword.join(" "))
        .with_context(|| format!("Invalid share base URL '{}'", base))?;
    println!("{}", url);
    Ok(())
}
