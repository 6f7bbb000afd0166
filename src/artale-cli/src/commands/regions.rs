//! Region and resistance option listings

use anyhow::Result;
use artale::resistance::tag_label;
use std::path::PathBuf;

use super::load_index;
use crate::config::Config;

/// List the regions available for filtering, marking the preset ones
pub fn regions(config: &Config, data: Option<PathBuf>) -> Result<()> {
    let index = load_index(&config.resolve_data_dir(data))?;
    let options = index.region_options();
    if options.is_empty() {
        println!("No regions found");
        return Ok(());
    }

    for option in options {
        let mark = if option.default_checked { "x" } else { " " };
        println!("[{}] {}", mark, option.name);
    }
    println!("\n[x] = searched by default");
    Ok(())
}

/// List the resistance tags available for filtering
pub fn resistances(config: &Config, data: Option<PathBuf>) -> Result<()> {
    let index = load_index(&config.resolve_data_dir(data))?;
    let tags = index.resistance_filter_tags();
    if tags.is_empty() {
        println!("No resistance tags found");
        return Ok(());
    }

    for tag in tags {
        println!("{:<6} {}", tag, tag_label(&tag));
    }
    Ok(())
}
