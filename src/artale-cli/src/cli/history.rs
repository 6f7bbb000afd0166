//! CLI definitions for the history command

use clap::Subcommand;

use super::search::OutputFormat;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List past searches, most recent first
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Re-run a past search by its list number (does not record it again)
    Run {
        /// Number shown by `history list`
        index: usize,

        /// Show every result instead of the first batch
        #[arg(short, long)]
        all: bool,
    },

    /// Delete all recorded searches
    Clear,
}
