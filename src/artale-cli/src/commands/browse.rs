//! Interactive browse session
//!
//! Reads one line per action from stdin. A plain line is a confirmed
//! search; lines starting with `:` are commands (see [`HELP`]).

use anyhow::{Context, Result};
use artale::{HistoryStore, LevelRange, Refresh, SearchController};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use super::history::print_records;
use super::{apply_filters, load_index, print_batch, terminal_marker};
use crate::cli::FilterArgs;
use crate::config::Config;

const HELP: &str = "\
Type a keyword and press Enter to search ('a | b' for either, 'boss' for bosses).
  (empty line)         show more results
  :only                toggle showing only matching drops
  :level MIN MAX       set level range (blank or 0 max for no limit)
  :region NAME         toggle a region
  :regions all|none|default
  :res TAG             toggle a resistance tag (e.g. F3, HS)
  :history             list past searches
  :run N               re-run past search N
  :clear-history       delete all past searches
  :share               print a share link for the current keyword
  :quit                leave";

/// Action parsed from one input line
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Search(String),
    More,
    ToggleOnlyMatched,
    Level(String, String),
    ToggleRegion(String),
    AllRegions,
    NoRegions,
    DefaultRegions,
    ToggleResistance(String),
    History,
    Run(usize),
    ClearHistory,
    Share,
    Help,
    Quit,
    Unknown(String),
}

fn parse_action(line: &str) -> Action {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return if line.trim().is_empty() {
            Action::More
        } else {
            Action::Search(line.to_string())
        };
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));
    match name {
        "only" => Action::ToggleOnlyMatched,
        "level" => {
            let mut bounds = rest.split_whitespace();
            let min = bounds.next().unwrap_or("").to_string();
            let max = bounds.next().unwrap_or("").to_string();
            Action::Level(min, max)
        }
        "region" if !rest.is_empty() => Action::ToggleRegion(rest.to_string()),
        "regions" => match rest {
            "all" => Action::AllRegions,
            "none" => Action::NoRegions,
            "default" => Action::DefaultRegions,
            _ => Action::Unknown(line.to_string()),
        },
        "res" if !rest.is_empty() => Action::ToggleResistance(rest.to_uppercase()),
        "history" => Action::History,
        "run" => rest
            .parse()
            .map_or_else(|_| Action::Unknown(line.to_string()), Action::Run),
        "clear-history" => Action::ClearHistory,
        "share" => Action::Share,
        "help" | "?" => Action::Help,
        "quit" | "q" | "exit" => Action::Quit,
        _ => Action::Unknown(line.to_string()),
    }
}

/// Handle the browse command
pub fn handle(config: &Config, data: Option<PathBuf>, filter: &FilterArgs) -> Result<()> {
    let index = load_index(&config.resolve_data_dir(data))?;
    let mut controller = SearchController::new(index, config.controller_options());
    controller.on_filter_changed(|filter| {
        tracing::debug!(
            keyword = %filter.keyword,
            regions = filter.selected_regions.len(),
            resistances = filter.selected_resistances.len(),
            "filter changed"
        );
    });
    let mut history = config.history_store();
    let marker = terminal_marker();

    println!("{}", HELP);
    let first = apply_filters(&mut controller, filter);
    show_results(&controller, &first, marker);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;

        let refresh = match parse_action(&line) {
            Action::Search(keyword) => {
                let refresh = controller.search_now(&keyword);
                controller.confirm_search(&mut history);
                Some(refresh)
            }
            Action::More => match controller.load_next_batch() {
                Some(batch) => {
                    print_batch(&controller, &batch, marker);
                    continue;
                }
                None => {
                    println!("-- No more results --");
                    continue;
                }
            },
            Action::ToggleOnlyMatched => {
                let only = !controller.filter().only_matched_drops;
                controller.set_only_matched_drops(only, 0);
                controller.flush()
            }
            Action::Level(min, max) => {
                controller.set_level_inputs(&min, &max, 0);
                print_levels(controller.filter().levels);
                controller.flush()
            }
            Action::ToggleRegion(region) => Some(controller.toggle_region(&region)),
            Action::AllRegions => Some(controller.select_all_regions()),
            Action::NoRegions => Some(controller.deselect_all_regions()),
            Action::DefaultRegions => Some(controller.select_default_regions()),
            Action::ToggleResistance(tag) => Some(controller.toggle_resistance(&tag)),
            Action::History => {
                print_records(&history.get_records());
                continue;
            }
            Action::Run(n) => match run_record(&mut controller, &mut history, n) {
                Some(refresh) => Some(refresh),
                None => continue,
            },
            Action::ClearHistory => {
                clear(&mut history);
                continue;
            }
            Action::Share => {
                match controller.share_url(config.share_base()) {
                    Ok(url) => println!("{}", url),
                    Err(e) => println!("Invalid share base URL: {}", e),
                }
                continue;
            }
            Action::Help => {
                println!("{}", HELP);
                continue;
            }
            Action::Quit => break,
            Action::Unknown(line) => {
                println!("Unknown command: {} (try :help)", line);
                continue;
            }
        };
        if let Some(refresh) = refresh {
            show_results(&controller, &refresh, marker);
        }
    }

    Ok(())
}

fn show_results(controller: &SearchController, refresh: &Refresh, marker: artale::Marker) {
    match &refresh.first {
        Some(batch) => {
            println!("{} results", refresh.total);
            print_batch(controller, batch, marker);
        }
        None => println!("No results"),
    }
}

fn print_levels(levels: LevelRange) {
    match levels.max {
        Some(max) => println!("Levels {}..={}", levels.min, max),
        None => println!("Levels {}+", levels.min),
    }
}

/// Re-run record `n` (1-based) without recording it again
fn run_record(
    controller: &mut SearchController,
    history: &mut HistoryStore,
    n: usize,
) -> Option<Refresh> {
    let records = history.get_records();
    let Some(record) = n.checked_sub(1).and_then(|i| records.get(i)) else {
        println!("No history record {}", n);
        return None;
    };
    println!("Searching '{}'", record.keyword);
    Some(controller.apply_history_record(record))
}

fn clear(history: &mut HistoryStore) {
    if history.get_records().is_empty() {
        println!("No search history yet");
        return;
    }
    history.clear_history();
    println!("Search history cleared");
}
