//! Search command handler

use anyhow::{Context, Result};
use artale::{Marker, SearchController};
use std::path::PathBuf;

use super::{apply_filters, load_index, print_batch, terminal_marker};
use crate::cli::{FilterArgs, OutputFormat};
use crate::config::Config;

/// Handle the search command
pub fn handle(
    config: &Config,
    data: Option<PathBuf>,
    filter: &FilterArgs,
    all: bool,
    format: OutputFormat,
    no_record: bool,
) -> Result<()> {
    let index = load_index(&config.resolve_data_dir(data))?;
    let mut controller = SearchController::new(index, config.controller_options());
    let first = apply_filters(&mut controller, filter).first;

    let mut batches: Vec<_> = first.into_iter().collect();
    if all {
        while let Some(batch) = controller.load_next_batch() {
            batches.push(batch);
        }
    }

    match format {
        OutputFormat::Table => print_table(&controller, &batches),
        OutputFormat::Json => print_json(&controller)?,
    }

    if !no_record {
        let mut history = config.history_store();
        if let Some(kind) = controller.confirm_search(&mut history) {
            tracing::info!(
                kind = %kind,
                keyword = %controller.applied_filter().keyword,
                "recorded search"
            );
        }
    }

    Ok(())
}

fn print_table(controller: &SearchController, batches: &[artale::Batch]) {
    if controller.results().is_empty() {
        println!("No results");
        return;
    }

    let marker = terminal_marker();
    for batch in batches {
        print_batch(controller, batch, marker);
    }

    let shown = controller.visible().len();
    let total = controller.results().len();
    if shown < total {
        println!("Showing {} of {} results (use --all to show everything)", shown, total);
    }
}

fn print_json(controller: &SearchController) -> Result<()> {
    let cards = controller.cards(controller.visible(), Marker::PLAIN);
    let json = serde_json::to_string_pretty(&cards).context("Failed to serialize results")?;
    println!("{}", json);
    Ok(())
}
