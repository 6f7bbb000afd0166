//! CLI argument definitions for artale
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod history;
mod search;

pub use core::{Cli, Commands};
pub use history::HistoryCommand;
pub use search::{FilterArgs, OutputFormat};
