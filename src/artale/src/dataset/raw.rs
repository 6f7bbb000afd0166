//! Raw dataset shapes and loading

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::error::DataLoadError;

/// The eight dataset files making up one data snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFile {
    Drops,
    Mobs,
    Items,
    BossTimers,
    SpawnMaps,
    MapCorrections,
    AreaDefaults,
    Aliases,
}

impl DatasetFile {
    pub const ALL: [DatasetFile; 8] = [
        DatasetFile::Drops,
        DatasetFile::Mobs,
        DatasetFile::Items,
        DatasetFile::BossTimers,
        DatasetFile::SpawnMaps,
        DatasetFile::MapCorrections,
        DatasetFile::AreaDefaults,
        DatasetFile::Aliases,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetFile::Drops => "drop_data.json",
            DatasetFile::Mobs => "mob.json",
            DatasetFile::Items => "item.json",
            DatasetFile::BossTimers => "boss_time.json",
            DatasetFile::SpawnMaps => "map.json",
            DatasetFile::MapCorrections => "map_exception.json",
            DatasetFile::AreaDefaults => "area.json",
            DatasetFile::Aliases => "alias.json",
        }
    }
}

/// Monster attribute tuple:
/// `[level, hp, mp, exp, physicalDef, magicDef, evasion, accuracyReq, spriteFile, resistanceCode?]`
///
/// Positions may hold numbers or strings; display fields keep their text form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MobAttributes {
    pub level: i64,
    pub hp: String,
    pub mp: String,
    pub exp: String,
    pub physical_def: String,
    pub magic_def: String,
    pub evasion: String,
    pub accuracy_req: String,
    pub sprite: Option<String>,
    pub resistance: Option<String>,
}

impl MobAttributes {
    pub fn from_tuple(values: &[Value]) -> Self {
        let text = |i: usize| values.get(i).map(value_text).unwrap_or_default();
        let optional = |i: usize| {
            values
                .get(i)
                .map(value_text)
                .filter(|s| !s.is_empty())
        };

        Self {
            level: values.first().and_then(value_level).unwrap_or(0),
            hp: text(1),
            mp: text(2),
            exp: text(3),
            physical_def: text(4),
            magic_def: text(5),
            evasion: text(6),
            accuracy_req: text(7),
            sprite: optional(8),
            resistance: optional(9),
        }
    }
}

impl<'de> Deserialize<'de> for MobAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Value>::deserialize(deserializer)?;
        Ok(Self::from_tuple(&values))
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_level(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// JSON text of each dataset, e.g. as fetched by a browser
#[derive(Debug, Clone, Copy)]
pub struct DatasetSources<'a> {
    pub drops: &'a str,
    pub mobs: &'a str,
    pub items: &'a str,
    pub boss_timers: &'a str,
    pub spawn_maps: &'a str,
    pub map_corrections: &'a str,
    pub area_defaults: &'a str,
    pub aliases: &'a str,
}

/// Datasets as parsed, before normalization
#[derive(Debug, Clone, Default)]
pub struct RawDatasets {
    /// Monster name → raw drop strings
    pub drops: IndexMap<String, Vec<String>>,
    /// Monster name → attribute tuple
    pub mobs: HashMap<String, MobAttributes>,
    /// Numeric item id (as string) → item name
    pub item_names: IndexMap<String, String>,
    /// Boss name → human-readable respawn time
    pub boss_timers: HashMap<String, String>,
    /// Monster name → raw map name → presence flag
    pub spawn_maps: IndexMap<String, IndexMap<String, Value>>,
    /// Raw map name or region → corrected name or `INVALID`
    pub map_corrections: HashMap<String, String>,
    /// Region → default-checked flag (0/1), in display order
    pub area_defaults: IndexMap<String, Value>,
    /// Canonical name → display alias
    pub aliases: HashMap<String, String>,
}

impl RawDatasets {
    /// Read every dataset file from `dir`.
    ///
    /// Files are read in parallel; any missing or unreadable file aborts the
    /// whole load.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DataLoadError> {
        let dir = dir.as_ref();
        let texts = DatasetFile::ALL
            .as_slice()
            .par_iter()
            .map(|file| {
                std::fs::read_to_string(dir.join(file.file_name())).map_err(|source| {
                    DataLoadError::Io {
                        file: file.file_name(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<String>, DataLoadError>>()?;

        Self::parse(&DatasetSources {
            drops: &texts[0],
            mobs: &texts[1],
            items: &texts[2],
            boss_timers: &texts[3],
            spawn_maps: &texts[4],
            map_corrections: &texts[5],
            area_defaults: &texts[6],
            aliases: &texts[7],
        })
    }

    /// Parse all datasets from JSON text
    pub fn parse(sources: &DatasetSources<'_>) -> Result<Self, DataLoadError> {
        Ok(Self {
            drops: parse_json(DatasetFile::Drops, sources.drops)?,
            mobs: parse_json(DatasetFile::Mobs, sources.mobs)?,
            item_names: parse_json(DatasetFile::Items, sources.items)?,
            boss_timers: parse_json(DatasetFile::BossTimers, sources.boss_timers)?,
            spawn_maps: parse_json(DatasetFile::SpawnMaps, sources.spawn_maps)?,
            map_corrections: parse_json(DatasetFile::MapCorrections, sources.map_corrections)?,
            area_defaults: parse_json(DatasetFile::AreaDefaults, sources.area_defaults)?,
            aliases: parse_json(DatasetFile::Aliases, sources.aliases)?,
        })
    }
}

fn parse_json<T: DeserializeOwned>(file: DatasetFile, text: &str) -> Result<T, DataLoadError> {
    serde_json::from_str(text).map_err(|source| DataLoadError::Parse {
        file: file.file_name(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mob_attributes_from_tuple() {
        let mob: MobAttributes = serde_json::from_value(json!([
            15, "1200(x2)", 0, 35, 40, 30, 5, 60, "slime.png", "F3I2"
        ]))
        .unwrap();
        assert_eq!(mob.level, 15);
        assert_eq!(mob.hp, "1200(x2)");
        assert_eq!(mob.mp, "0");
        assert_eq!(mob.accuracy_req, "60");
        assert_eq!(mob.sprite.as_deref(), Some("slime.png"));
        assert_eq!(mob.resistance.as_deref(), Some("F3I2"));
    }

    #[test]
    fn test_mob_attributes_short_tuple() {
        let mob: MobAttributes = serde_json::from_value(json!(["7", 50])).unwrap();
        assert_eq!(mob.level, 7);
        assert_eq!(mob.hp, "50");
        assert_eq!(mob.resistance, None);

        let mob: MobAttributes =
            serde_json::from_value(json!([3, 1, 1, 1, 1, 1, 1, 1, "a.png", null])).unwrap();
        assert_eq!(mob.resistance, None);
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let sources = DatasetSources {
            drops: r#"{"Zombie": [], "Apple": []}"#,
            mobs: "{}",
            items: "{}",
            boss_timers: "{}",
            spawn_maps: "{}",
            map_corrections: "{}",
            area_defaults: r#"{"Victoria": 1, "Ludibrium": 0}"#,
            aliases: "{}",
        };
        let raw = RawDatasets::parse(&sources).unwrap();
        let monsters: Vec<&str> = raw.drops.keys().map(String::as_str).collect();
        assert_eq!(monsters, ["Zombie", "Apple"]);
        let areas: Vec<&str> = raw.area_defaults.keys().map(String::as_str).collect();
        assert_eq!(areas, ["Victoria", "Ludibrium"]);
    }

    #[test]
    fn test_parse_error_names_file() {
        let sources = DatasetSources {
            drops: "{}",
            mobs: "not json",
            items: "{}",
            boss_timers: "{}",
            spawn_maps: "{}",
            map_corrections: "{}",
            area_defaults: "{}",
            aliases: "{}",
        };
        let err = RawDatasets::parse(&sources).unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { file: "mob.json", .. }));
        assert!(err.to_string().contains("mob.json"));
    }

    #[test]
    fn test_load_dir_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        for file in DatasetFile::ALL.iter().skip(1) {
            std::fs::write(dir.path().join(file.file_name()), "{}").unwrap();
        }
        let err = RawDatasets::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { file: "drop_data.json", .. }));
    }

    #[test]
    fn test_load_dir_reads_all_files() {
        let dir = tempfile::tempdir().unwrap();
        for file in DatasetFile::ALL {
            std::fs::write(dir.path().join(file.file_name()), "{}").unwrap();
        }
        std::fs::write(
            dir.path().join("drop_data.json"),
            r#"{"Slime": ["Sword"]}"#,
        )
        .unwrap();
        let raw = RawDatasets::load_dir(dir.path()).unwrap();
        assert_eq!(raw.drops["Slime"], vec!["Sword".to_string()]);
    }
}
