//! Command handlers for artale CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod browse;
pub mod configure;
pub mod history;
pub mod regions;
pub mod search;
pub mod share;

use anyhow::{anyhow, Result};
use artale::{Batch, Marker, NormalizedIndex, Refresh, SearchController};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use crate::cli::FilterArgs;

/// Load the datasets, reporting failure the way the page does
pub fn load_index(data_dir: &Path) -> Result<Arc<NormalizedIndex>> {
    NormalizedIndex::load_dir(data_dir)
        .map(Arc::new)
        .map_err(|e| anyhow!("Failed to load data: {}", e))
}

/// Highlight with ANSI colors only when stdout is a terminal
pub fn terminal_marker() -> Marker {
    if std::io::stdout().is_terminal() {
        Marker::ANSI
    } else {
        Marker::PLAIN
    }
}

/// Apply region, resistance, level and only-matched filters, then the keyword
pub fn apply_filters(controller: &mut SearchController, filter: &FilterArgs) -> Refresh {
    if filter.all_regions {
        controller.select_all_regions();
    } else if !filter.region.is_empty() {
        let known: Vec<String> = controller
            .region_options()
            .into_iter()
            .map(|option| option.name)
            .collect();
        controller.deselect_all_regions();
        for region in &filter.region {
            if !known.contains(region) {
                tracing::warn!(region = %region, "unknown region");
            }
            controller.toggle_region(region);
        }
    }

    for tag in &filter.resistances {
        controller.toggle_resistance(tag);
    }

    controller.set_only_matched_drops(filter.only_matched, 0);
    controller.set_level_inputs(
        filter.min_level.as_deref().unwrap_or(""),
        filter.max_level.as_deref().unwrap_or(""),
        0,
    );

    let mut keyword = filter.keyword();
    if keyword.is_empty() {
        if let Some(url) = &filter.url {
            keyword = artale::initial_keyword(url).unwrap_or_default();
        }
    }
    controller.search_now(&keyword)
}

/// Print the cards of one batch
pub fn print_batch(controller: &SearchController, batch: &Batch, marker: Marker) {
    for card in controller.cards(controller.entries(batch), marker) {
        println!("{}", card.render_text());
    }
    if batch.no_more {
        println!("-- No more results --");
    }
}
