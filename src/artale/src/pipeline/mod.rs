//! Filter pipeline
//!
//! [`recompute`] turns the immutable index plus the current [`FilterState`]
//! into the ordered list of entries to display. It never mutates its inputs;
//! the controller owns the filter state and the [`LazyCursor`].

mod lazy;

pub use lazy::{Batch, LazyCursor, DEFAULT_BATCH_SIZE};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::IntErrorKind;

use crate::dataset::{region_of, DropItem, NormalizedIndex};
use crate::matching::{Keyword, MatchEngine};
use crate::resistance;

/// Inclusive level bounds; `max == None` is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    pub min: i64,
    pub max: Option<i64>,
}

impl LevelRange {
    pub fn new(min: i64, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// Build from free-text inputs.
    ///
    /// Leading integers are used and saturate on overflow; blank, unparsable
    /// or zero inputs fall back to 0 for the minimum and unbounded for the
    /// maximum.
    pub fn from_inputs(min: &str, max: &str) -> Self {
        Self {
            min: parse_leading_int(min).unwrap_or(0),
            max: parse_leading_int(max).filter(|v| *v != 0),
        }
    }

    pub fn contains(&self, level: i64) -> bool {
        level >= self.min && self.max.map_or(true, |max| level <= max)
    }
}

fn parse_leading_int(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let sign_len = usize::from(input.starts_with(['-', '+']));
    let digits = input[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(input.len(), |end| end + sign_len);
    match input[..digits].parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Everything the user can filter by
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub keyword: String,
    /// Show only the drops matching the keyword
    pub only_matched_drops: bool,
    pub levels: LevelRange,
    /// Empty selection passes every monster
    pub selected_regions: BTreeSet<String>,
    /// Empty selection passes every monster
    pub selected_resistances: BTreeSet<String>,
}

impl FilterState {
    pub fn with_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }
}

/// One monster row of the result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub monster: String,
    pub level: i64,
    /// Drops to render: the matched subset or the full list
    pub items: Vec<DropItem>,
    pub matched_items: Vec<DropItem>,
    pub monster_matched: bool,
}

/// Region predicate.
///
/// Monsters with unknown location always pass, as does every monster when
/// nothing is selected.
pub fn passes_region(index: &NormalizedIndex, monster: &str, selected: &BTreeSet<String>) -> bool {
    let Some(maps) = index.spawn_maps(monster) else {
        return true;
    };
    if selected.is_empty() {
        return true;
    }
    maps.keys().any(|map| selected.contains(region_of(map)))
}

/// Produce the ordered result list for `filter`
pub fn recompute(index: &NormalizedIndex, filter: &FilterState) -> Vec<ResultEntry> {
    let engine = MatchEngine::new(index);
    let keyword = Keyword::new(&filter.keyword);

    let mut entries: Vec<ResultEntry> = index
        .monsters()
        .filter(|(monster, _)| {
            passes_region(index, monster, &filter.selected_regions)
                && resistance::passes_filter(
                    index.resistance_code(monster),
                    &filter.selected_resistances,
                )
        })
        .filter_map(|(monster, items)| {
            let monster_matched = engine.matches_keyword(monster, &keyword);
            let matched_items: Vec<DropItem> = items
                .iter()
                .filter(|item| engine.matches_keyword(&item.name, &keyword))
                .cloned()
                .collect();
            let level = index.level(monster);

            let keep = (monster_matched || !matched_items.is_empty() || keyword.is_empty())
                && filter.levels.contains(level);
            if !keep {
                return None;
            }

            let items = if filter.only_matched_drops && !keyword.is_empty() {
                matched_items.clone()
            } else {
                items.to_vec()
            };

            Some(ResultEntry {
                monster: monster.to_string(),
                level,
                items,
                matched_items,
                monster_matched,
            })
        })
        .collect();

    // Stable: equal levels keep drop table order
    entries.sort_by_key(|entry| entry.level);

    tracing::debug!(
        keyword = %filter.keyword,
        results = entries.len(),
        "recomputed results"
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{fixtures, DatasetSources, ItemCategory};

    fn regions(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn monsters(entries: &[ResultEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.monster.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_sorted_by_level() {
        let index = fixtures::index();
        let entries = recompute(&index, &FilterState::default());
        // Drifter has no attributes and sorts as level 0
        assert_eq!(
            monsters(&entries),
            ["Drifter", "Snail", "Slime", "Ghost", "Balrog"]
        );
    }

    #[test]
    fn test_keyword_sword_end_to_end() {
        let index = NormalizedIndex::from_sources(&DatasetSources {
            drops: r#"{"Slime": ["Red Potion X 3", "Sword"]}"#,
            items: r#"{"1000050": "Sword", "2000010": "Red Potion"}"#,
            ..fixtures::sources()
        })
        .unwrap();
        let entries = recompute(&index, &FilterState::with_keyword("sword"));
        assert_eq!(entries.len(), 1);
        let slime = &entries[0];
        assert_eq!(slime.monster, "Slime");
        assert!(!slime.monster_matched);
        let matched: Vec<&str> = slime.matched_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(matched, ["Sword"]);
        assert_eq!(slime.matched_items[0].category, ItemCategory::Equip);
        assert_eq!(slime.items.len(), 2);
    }

    #[test]
    fn test_only_matched_drops() {
        let index = fixtures::index();
        let filter = FilterState {
            keyword: "potion".to_string(),
            only_matched_drops: true,
            ..FilterState::default()
        };
        let entries = recompute(&index, &filter);
        assert_eq!(monsters(&entries), ["Snail", "Slime", "Balrog"]);
        for entry in &entries {
            assert_eq!(entry.items, entry.matched_items);
        }

        // Without a keyword the full list is shown even when the flag is set
        let filter = FilterState {
            only_matched_drops: true,
            ..FilterState::default()
        };
        let entries = recompute(&index, &filter);
        let slime = entries.iter().find(|e| e.monster == "Slime").unwrap();
        assert_eq!(slime.items.len(), 3);
    }

    #[test]
    fn test_monster_match_keeps_all_items() {
        let index = fixtures::index();
        let entries = recompute(&index, &FilterState::with_keyword("boss"));
        assert_eq!(monsters(&entries), ["Balrog"]);
        assert!(entries[0].monster_matched);
        assert!(entries[0].matched_items.is_empty());
        assert_eq!(entries[0].items.len(), 2);
    }

    #[test]
    fn test_level_range() {
        let index = fixtures::index();
        let filter = FilterState {
            levels: LevelRange::new(5, Some(30)),
            ..FilterState::default()
        };
        assert_eq!(monsters(&recompute(&index, &filter)), ["Slime", "Ghost"]);
    }

    #[test]
    fn test_empty_region_selection_is_open() {
        let index = fixtures::index();
        let open = recompute(&index, &FilterState::default());
        let filter = FilterState {
            selected_regions: BTreeSet::new(),
            ..FilterState::default()
        };
        assert_eq!(recompute(&index, &filter), open);
    }

    #[test]
    fn test_region_filter_excludes_disjoint_monsters() {
        let index = fixtures::index();
        let filter = FilterState {
            selected_regions: regions(&["沉睡森林"]),
            ..FilterState::default()
        };
        // Drifter and Ghost have no spawn entry and always pass
        assert_eq!(
            monsters(&recompute(&index, &filter)),
            ["Drifter", "Ghost", "Balrog"]
        );
    }

    #[test]
    fn test_resistance_filter() {
        let index = fixtures::index();
        let filter = FilterState {
            selected_resistances: regions(&["I2"]),
            ..FilterState::default()
        };
        assert_eq!(monsters(&recompute(&index, &filter)), ["Slime"]);

        let filter = FilterState {
            selected_resistances: regions(&["ALL2", "HS"]),
            ..FilterState::default()
        };
        assert_eq!(monsters(&recompute(&index, &filter)), ["Ghost", "Balrog"]);
    }

    #[test]
    fn test_recompute_is_pure() {
        let index = fixtures::index();
        let filter = FilterState::with_keyword("shell");
        let before = filter.clone();
        let first = recompute(&index, &filter);
        let second = recompute(&index, &filter);
        assert_eq!(first, second);
        assert_eq!(filter, before);
    }

    #[test]
    fn test_level_range_from_inputs() {
        assert_eq!(LevelRange::from_inputs("", ""), LevelRange::new(0, None));
        assert_eq!(LevelRange::from_inputs("10", "50"), LevelRange::new(10, Some(50)));
        assert_eq!(LevelRange::from_inputs(" 12abc", "0"), LevelRange::new(12, None));
        assert_eq!(LevelRange::from_inputs("x", "-5"), LevelRange::new(0, Some(-5)));
        assert!(LevelRange::default().contains(i64::MAX));
    }

    #[test]
    fn test_level_inputs_saturate_on_overflow() {
        let huge = LevelRange::from_inputs("99999999999999999999", "");
        assert_eq!(huge, LevelRange::new(i64::MAX, None));
        assert!(!huge.contains(200));

        let tiny = LevelRange::from_inputs("", "-99999999999999999999");
        assert_eq!(tiny.max, Some(i64::MIN));

        let index = fixtures::index();
        let filter = FilterState {
            levels: huge,
            ..FilterState::default()
        };
        assert!(recompute(&index, &filter).is_empty());
        assert_eq!(LevelRange::from_inputs("+", "-"), LevelRange::new(0, None));
    }
}
