//! Core CLI definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::history::HistoryCommand;
use super::search::{FilterArgs, OutputFormat};

#[derive(Parser)]
#[command(name = "artale")]
#[command(about = "Artale monster drop lookup", long_about = None)]
pub struct Cli {
    /// Directory containing the dataset JSON files
    #[arg(long, global = true, env = "ARTALE_DATA")]
    pub data: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search monsters and drops by keyword
    #[command(visible_alias = "s")]
    Search {
        #[command(flatten)]
        filter: FilterArgs,

        /// Show every result instead of the first batch
        #[arg(short, long)]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Do not record this search in the history
        #[arg(long)]
        no_record: bool,
    },

    /// Interactive search session
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Search history (list, run, clear)
    #[command(visible_alias = "h")]
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Print a shareable link for a keyword
    Share {
        /// Keyword to embed in the link
        #[arg(num_args = 0..)]
        keyword: Vec<String>,

        /// Page URL to build the link on (uses configured default if not provided)
        #[arg(long)]
        base: Option<String>,
    },

    /// List the regions available for filtering
    Regions,

    /// List the resistance tags available for filtering
    Resistances,

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default dataset directory
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Set number of results revealed per batch
        #[arg(long)]
        batch_size: Option<usize>,

        /// Set debounce delay for interactive edits, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Set default page URL for share links
        #[arg(long)]
        share_base_url: Option<String>,

        /// Set history database path
        #[arg(long)]
        history_db: Option<PathBuf>,

        /// Set history cookie file path
        #[arg(long)]
        history_cookie_jar: Option<PathBuf>,

        /// Set history cookie lifetime in days
        #[arg(long)]
        cookie_ttl_days: Option<i64>,

        /// Mark the history cookie secure
        #[arg(long)]
        secure_cookies: Option<bool>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "artale", "search", "red", "potion", "--only-matched", "--min-level", "10",
            "--region", "維多利亞", "--region", "沉睡森林", "-f", "json", "--all",
        ])
        .unwrap();

        let Commands::Search {
            filter,
            all,
            format,
            no_record,
        } = cli.command
        else {
            panic!("expected search command");
        };
        assert_eq!(filter.keyword(), "red potion");
        assert!(filter.only_matched);
        assert_eq!(filter.min_level.as_deref(), Some("10"));
        assert_eq!(filter.region, ["維多利亞", "沉睡森林"]);
        assert!(all);
        assert_eq!(format, OutputFormat::Json);
        assert!(!no_record);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["artale", "regions", "--data", "snap", "-vv"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("snap")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Regions));
    }

    #[test]
    fn test_parse_alias() {
        let cli = Cli::try_parse_from(["artale", "s", "boss"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { .. }));
    }

    #[test]
    fn test_region_flags_conflict() {
        let result = Cli::try_parse_from([
            "artale", "search", "--all-regions", "--region", "維多利亞",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_history_run() {
        let cli = Cli::try_parse_from(["artale", "history", "run", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                command: HistoryCommand::Run { index: 2, .. }
            }
        ));
    }
}
