//! Spawn map name correction

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// Separator between the region and the rest of a map name
pub const REGION_DELIMITER: char = '：';

/// Correction value marking a map or whole region as excluded
pub const INVALID_SENTINEL: &str = "INVALID";

/// Corrected map name → presence flag, in source order
pub type SpawnMaps = IndexMap<String, Value>;

/// Region prefix of a map name (the whole name when it has no delimiter)
pub fn region_of(map_name: &str) -> &str {
    map_name
        .split_once(REGION_DELIMITER)
        .map_or(map_name, |(region, _)| region)
}

/// Apply the correction table to a single raw map name.
///
/// An exact entry for the full name wins; otherwise the region prefix is
/// looked up. Returns `None` when the map or its region is marked invalid.
pub fn correct_map_name(map_name: &str, corrections: &HashMap<String, String>) -> Option<String> {
    if let Some(corrected) = corrections.get(map_name) {
        if corrected == INVALID_SENTINEL {
            return None;
        }
        return Some(corrected.clone());
    }

    let (region, rest) = match map_name.split_once(REGION_DELIMITER) {
        Some((region, rest)) => (region, Some(rest)),
        None => (map_name, None),
    };

    let region = match corrections.get(region) {
        Some(corrected) if corrected == INVALID_SENTINEL => return None,
        Some(corrected) if !corrected.is_empty() => corrected.as_str(),
        _ => region,
    };

    Some(match rest {
        Some(rest) => format!("{}{}{}", region, REGION_DELIMITER, rest),
        None => region.to_string(),
    })
}

/// Correct every monster's spawn maps.
///
/// Monsters left with no valid map are omitted entirely so that callers see
/// "unknown location" rather than "no maps".
pub fn correct_spawn_maps(
    raw: &IndexMap<String, IndexMap<String, Value>>,
    corrections: &HashMap<String, String>,
) -> HashMap<String, SpawnMaps> {
    let mut spawn = HashMap::with_capacity(raw.len());
    let mut dropped = 0usize;

    for (monster, maps) in raw {
        let mut corrected = SpawnMaps::new();
        for (map_name, flag) in maps {
            match correct_map_name(map_name, corrections) {
                Some(name) => {
                    corrected.insert(name, flag.clone());
                }
                None => dropped += 1,
            }
        }

        if corrected.is_empty() {
            tracing::debug!(monster = %monster, "no valid spawn maps after correction");
            continue;
        }
        spawn.insert(monster.clone(), corrected);
    }

    tracing::debug!(monsters = spawn.len(), dropped, "corrected spawn maps");
    spawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn corrections(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_region_of() {
        assert_eq!(region_of("維多利亞：弓箭手村"), "維多利亞");
        assert_eq!(region_of("A：B：C"), "A");
        assert_eq!(region_of("NoDelimiter"), "NoDelimiter");
    }

    #[test]
    fn test_exact_invalid_is_dropped() {
        let table = corrections(&[("A：B", "INVALID")]);
        assert_eq!(correct_map_name("A：B", &table), None);
        assert_eq!(correct_map_name("A：C", &table), Some("A：C".to_string()));
    }

    #[test]
    fn test_exact_rename() {
        let table = corrections(&[("A：B", "X：Y")]);
        assert_eq!(correct_map_name("A：B", &table), Some("X：Y".to_string()));
    }

    #[test]
    fn test_region_substitution() {
        let table = corrections(&[("A", "A2")]);
        assert_eq!(correct_map_name("A：C", &table), Some("A2：C".to_string()));
        assert_eq!(correct_map_name("A：C：D", &table), Some("A2：C：D".to_string()));
    }

    #[test]
    fn test_invalid_region_is_dropped() {
        let table = corrections(&[("Hidden", "INVALID")]);
        assert_eq!(correct_map_name("Hidden：Street", &table), None);
    }

    #[test]
    fn test_monster_without_valid_maps_is_removed() {
        let table = corrections(&[("Hidden", "INVALID"), ("A", "A2")]);
        let mut raw = IndexMap::new();
        let mut ghost = IndexMap::new();
        ghost.insert("Hidden：Street".to_string(), json!(1));
        raw.insert("Ghost".to_string(), ghost);
        let mut slime = IndexMap::new();
        slime.insert("A：C".to_string(), json!(1));
        slime.insert("Hidden：Cave".to_string(), json!(1));
        raw.insert("Slime".to_string(), slime);

        let spawn = correct_spawn_maps(&raw, &table);
        assert!(!spawn.contains_key("Ghost"));
        let slime_maps: Vec<&str> = spawn["Slime"].keys().map(String::as_str).collect();
        assert_eq!(slime_maps, ["A2：C"]);
    }

    #[test]
    fn test_renamed_maps_merge() {
        let table = corrections(&[("Old", "New")]);
        let mut raw = IndexMap::new();
        let mut maps = IndexMap::new();
        maps.insert("Old：Field".to_string(), json!(1));
        maps.insert("New：Field".to_string(), json!(1));
        raw.insert("Snail".to_string(), maps);

        let spawn = correct_spawn_maps(&raw, &table);
        assert_eq!(spawn["Snail"].len(), 1);
    }
}
