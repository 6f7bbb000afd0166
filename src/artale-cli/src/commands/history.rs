//! History command handlers

use anyhow::{Context, Result};
use artale::{HistoryRecord, SearchController};
use chrono::Local;
use std::path::PathBuf;

use super::{load_index, print_batch, terminal_marker};
use crate::cli::{HistoryCommand, OutputFormat};
use crate::config::Config;

/// Handle the history command
pub fn handle(config: &Config, data: Option<PathBuf>, command: HistoryCommand) -> Result<()> {
    let mut history = config.history_store();

    match command {
        HistoryCommand::List { format } => {
            let records = history.get_records();
            match format {
                OutputFormat::Table => print_records(&records),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&records)
                        .context("Failed to serialize history")?;
                    println!("{}", json);
                }
            }
        }

        HistoryCommand::Run { index, all } => {
            let records = history.get_records();
            let Some(record) = index.checked_sub(1).and_then(|i| records.get(i)) else {
                println!("No history record {}", index);
                println!("\nTry 'artale history list' to see recorded searches");
                return Ok(());
            };

            let db = load_index(&config.resolve_data_dir(data))?;
            let mut controller = SearchController::new(db, config.controller_options());
            let marker = terminal_marker();

            let Some(first) = controller.apply_history_record(record).first else {
                println!("No results for '{}'", record.keyword);
                return Ok(());
            };
            print_batch(&controller, &first, marker);
            if all {
                while let Some(batch) = controller.load_next_batch() {
                    print_batch(&controller, &batch, marker);
                }
            }
        }

        HistoryCommand::Clear => {
            if history.get_records().is_empty() {
                println!("No search history yet");
            } else {
                history.clear_history();
                println!("Search history cleared");
            }
        }
    }

    Ok(())
}

fn local_time(record: &HistoryRecord) -> String {
    record
        .recorded_at()
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Numbered table of records, most recent first
pub fn print_records(records: &[HistoryRecord]) {
    if records.is_empty() {
        println!("No search history yet");
        return;
    }

    println!("{:>3}  {:<8} {:<20} Keyword", "#", "Type", "Time");
    println!("{}", "-".repeat(50));
    for (i, record) in records.iter().enumerate() {
        println!(
            "{:>3}  {:<8} {:<20} {}",
            i + 1,
            record.kind,
            local_time(record),
            record.keyword
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artale::RecordType;

    #[test]
    fn test_local_time_out_of_range() {
        let record = HistoryRecord {
            kind: RecordType::Item,
            keyword: "sword".to_string(),
            timestamp: i64::MAX,
        };
        assert_eq!(local_time(&record), "-");
    }

    #[test]
    fn test_print_records_does_not_panic() {
        print_records(&[]);
        print_records(&[HistoryRecord {
            kind: RecordType::Monster,
            keyword: "slime".to_string(),
            timestamp: 1_700_000_000_000,
        }]);
    }
}
