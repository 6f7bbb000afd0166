//! CLI definitions shared by the search and browse commands

use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Keyword; separate alternatives with '|', use "boss" for every boss
    #[arg(num_args = 0.., value_name = "KEYWORD")]
    pub keyword_words: Vec<String>,

    /// Take the initial keyword from a share link
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Show only the drops matching the keyword
    #[arg(short, long)]
    pub only_matched: bool,

    /// Minimum monster level
    #[arg(long, allow_hyphen_values = true)]
    pub min_level: Option<String>,

    /// Maximum monster level
    #[arg(long, allow_hyphen_values = true)]
    pub max_level: Option<String>,

    /// Restrict to a region (repeatable; defaults to the preset regions)
    #[arg(short, long, conflicts_with = "all_regions")]
    pub region: Vec<String>,

    /// Search every region
    #[arg(long)]
    pub all_regions: bool,

    /// Resistance tag to filter by, e.g. F3 or HS (repeatable)
    #[arg(long = "resistance", value_name = "TAG")]
    pub resistances: Vec<String>,
}

impl FilterArgs {
    /// Keyword words joined with single spaces
    pub fn keyword(&self) -> String {
        self.keyword_words.join(" ")
    }
}
