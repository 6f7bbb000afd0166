//! Keyword matching, display names and highlighting
//!
//! A keyword is either a single case-insensitive substring or an OR-list
//! separated by `|`. Each part matches a name, one of its aliases, or (for the
//! literal part `boss`) any monster listed in the boss timer table.

use regex::{Captures, RegexBuilder};

use crate::dataset::NormalizedIndex;

/// Separator between alternatives in an OR-keyword
pub const OR_DELIMITER: char = '|';

/// Special keyword part matching every boss
pub const BOSS_KEYWORD: &str = "boss";

/// A search keyword prepared for repeated matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    raw: String,
    /// Lowercased alternatives; empty when the keyword is empty
    parts: Vec<String>,
}

impl Keyword {
    pub fn new(raw: &str) -> Self {
        let parts = if raw.is_empty() {
            Vec::new()
        } else if raw.contains(OR_DELIMITER) {
            raw.split(OR_DELIMITER)
                .map(|part| part.trim().to_lowercase())
                .collect()
        } else {
            vec![raw.to_lowercase()]
        };
        Self {
            raw: raw.to_string(),
            parts,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_or_list(&self) -> bool {
        self.raw.contains(OR_DELIMITER)
    }

    /// Lowercased alternatives (a single entry for plain keywords)
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

/// Emphasis markers inserted around highlighted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub open: &'static str,
    pub close: &'static str,
}

impl Marker {
    pub const HTML: Marker = Marker {
        open: "<mark>",
        close: "</mark>",
    };

    pub const ANSI: Marker = Marker {
        open: "\x1b[1;33m",
        close: "\x1b[0m",
    };

    pub const PLAIN: Marker = Marker {
        open: "",
        close: "",
    };
}

/// Keyword predicates and display names backed by the index's boss and alias tables
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine<'a> {
    index: &'a NormalizedIndex,
}

impl<'a> MatchEngine<'a> {
    pub fn new(index: &'a NormalizedIndex) -> Self {
        Self { index }
    }

    /// Whether `name` matches `keyword`; an empty keyword matches everything
    pub fn matches(&self, name: &str, keyword: &str) -> bool {
        self.matches_keyword(name, &Keyword::new(keyword))
    }

    pub fn matches_keyword(&self, name: &str, keyword: &Keyword) -> bool {
        if keyword.is_empty() {
            return true;
        }

        let lowered = name.to_lowercase();
        let alias = self.index.alias(name).map(str::to_lowercase);

        keyword.parts().iter().any(|part| {
            if part == BOSS_KEYWORD && self.index.is_boss(name) {
                return true;
            }
            lowered.contains(part.as_str())
                || alias.as_deref().is_some_and(|a| a.contains(part.as_str()))
        })
    }

    /// `name(alias)` when a distinct alias exists, then ` (BOSS)` and ` X <quantity>`
    pub fn display_name(&self, name: &str, quantity: Option<&str>) -> String {
        let mut display = match self.index.alias(name) {
            Some(alias) if alias != name => format!("{}({})", name, alias),
            _ => name.to_string(),
        };
        if self.index.is_boss(name) {
            display.push_str(" (BOSS)");
        }
        if let Some(quantity) = quantity.filter(|q| !q.is_empty()) {
            display.push_str(" X ");
            display.push_str(quantity);
        }
        display
    }
}

/// Wrap every case-insensitive occurrence of `keyword` in `marker`.
///
/// OR-keywords are applied one part at a time, so a later part may match
/// inside markers inserted by an earlier one. Empty parts are skipped.
pub fn highlight(text: &str, keyword: &str, marker: Marker) -> String {
    if keyword.is_empty() {
        return text.to_string();
    }

    if keyword.contains(OR_DELIMITER) {
        keyword
            .split(OR_DELIMITER)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .fold(text.to_string(), |acc, part| mark_all(&acc, part, marker))
    } else {
        mark_all(text, keyword, marker)
    }
}

fn mark_all(text: &str, needle: &str, marker: Marker) -> String {
    let pattern = match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::debug!(needle = %needle, error = %e, "highlight pattern rejected");
            return text.to_string();
        }
    };

    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}{}", marker.open, &caps[0], marker.close)
        })
        .into_owned()
}
