//! Query-ready index built once per data snapshot

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use super::items::{compare_drop_order, DropItem};
use super::maps::{correct_spawn_maps, region_of, SpawnMaps};
use super::raw::{DatasetSources, MobAttributes, RawDatasets};
use crate::error::DataLoadError;
use crate::resistance;

/// A region the user can filter by
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOption {
    pub name: String,
    pub default_checked: bool,
}

/// Read-only view of one monster
#[derive(Debug, Clone, Copy)]
pub struct Monster<'a> {
    pub name: &'a str,
    pub attributes: Option<&'a MobAttributes>,
    pub is_boss: bool,
    pub respawn_time: Option<&'a str>,
    pub spawn_maps: Option<&'a SpawnMaps>,
}

impl<'a> Monster<'a> {
    pub fn level(&self) -> i64 {
        self.attributes.map_or(0, |a| a.level)
    }

    pub fn resistance_code(&self) -> Option<&'a str> {
        self.attributes.and_then(|a| a.resistance.as_deref())
    }
}

/// Normalized datasets.
///
/// Built exactly once from [`RawDatasets`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct NormalizedIndex {
    /// Monster name → sorted drop items, in drop table order
    drops: IndexMap<String, Vec<DropItem>>,
    mobs: HashMap<String, MobAttributes>,
    name_to_id: HashMap<String, u32>,
    boss_timers: HashMap<String, String>,
    spawn_maps: HashMap<String, SpawnMaps>,
    /// Region → default-checked, in area table order
    areas: IndexMap<String, bool>,
    aliases: HashMap<String, String>,
}

impl NormalizedIndex {
    /// Load and normalize every dataset in `dir`
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DataLoadError> {
        let index = Self::build(RawDatasets::load_dir(dir)?);
        tracing::info!(
            monsters = index.drops.len(),
            items = index.name_to_id.len(),
            bosses = index.boss_timers.len(),
            "loaded drop database"
        );
        Ok(index)
    }

    /// Parse and normalize datasets from JSON text
    pub fn from_sources(sources: &DatasetSources<'_>) -> Result<Self, DataLoadError> {
        Ok(Self::build(RawDatasets::parse(sources)?))
    }

    pub fn build(raw: RawDatasets) -> Self {
        // Later duplicate names overwrite earlier ones
        let mut name_to_id = HashMap::with_capacity(raw.item_names.len());
        for (id, name) in &raw.item_names {
            match id.trim().parse::<u32>() {
                Ok(id) => {
                    name_to_id.insert(name.clone(), id);
                }
                Err(_) => tracing::debug!(id = %id, name = %name, "skipping non-numeric item id"),
            }
        }

        let drops = raw
            .drops
            .iter()
            .map(|(monster, items)| {
                let mut items: Vec<DropItem> = items
                    .iter()
                    .map(|item| DropItem::parse(item, &name_to_id))
                    .collect();
                items.sort_by(compare_drop_order);
                (monster.clone(), items)
            })
            .collect();

        let spawn_maps = correct_spawn_maps(&raw.spawn_maps, &raw.map_corrections);

        let areas = raw
            .area_defaults
            .iter()
            .map(|(region, flag)| (region.clone(), flag.as_i64() == Some(1)))
            .collect();

        Self {
            drops,
            mobs: raw.mobs,
            name_to_id,
            boss_timers: raw.boss_timers,
            spawn_maps,
            areas,
            aliases: raw.aliases,
        }
    }

    /// Monsters with their drop lists, in drop table order
    pub fn monsters(&self) -> impl Iterator<Item = (&str, &[DropItem])> {
        self.drops
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// View of a monster listed in the drop table
    pub fn monster(&self, name: &str) -> Option<Monster<'_>> {
        let (name, _) = self.drops.get_key_value(name)?;
        Some(Monster {
            name,
            attributes: self.mobs.get(name),
            is_boss: self.is_boss(name),
            respawn_time: self.respawn_time(name),
            spawn_maps: self.spawn_maps.get(name),
        })
    }

    pub fn drops(&self, monster: &str) -> Option<&[DropItem]> {
        self.drops.get(monster).map(Vec::as_slice)
    }

    /// Monster level, 0 when unknown
    pub fn level(&self, monster: &str) -> i64 {
        self.mobs.get(monster).map_or(0, |m| m.level)
    }

    pub fn resistance_code(&self, monster: &str) -> Option<&str> {
        self.mobs.get(monster).and_then(|m| m.resistance.as_deref())
    }

    /// Boss status comes solely from the boss timer table
    pub fn is_boss(&self, name: &str) -> bool {
        self.boss_timers.contains_key(name)
    }

    pub fn respawn_time(&self, name: &str) -> Option<&str> {
        self.boss_timers.get(name).map(String::as_str)
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Corrected spawn maps; `None` means the location is unknown
    pub fn spawn_maps(&self, monster: &str) -> Option<&SpawnMaps> {
        self.spawn_maps.get(monster)
    }

    pub fn item_id(&self, name: &str) -> Option<u32> {
        self.name_to_id.get(name).copied()
    }

    /// Regions from the area table that occur in at least one spawn map
    pub fn region_options(&self) -> Vec<RegionOption> {
        let present: HashSet<&str> = self
            .spawn_maps
            .values()
            .flat_map(|maps| maps.keys().map(|name| region_of(name)))
            .collect();

        self.areas
            .iter()
            .filter(|(region, _)| present.contains(region.as_str()))
            .map(|(region, default_checked)| RegionOption {
                name: region.clone(),
                default_checked: *default_checked,
            })
            .collect()
    }

    /// Regions checked by default
    pub fn default_regions(&self) -> BTreeSet<String> {
        self.region_options()
            .into_iter()
            .filter(|option| option.default_checked)
            .map(|option| option.name)
            .collect()
    }

    /// Resistance filter tags derived from every monster's code
    pub fn resistance_filter_tags(&self) -> Vec<String> {
        resistance::filter_tags(self.mobs.values().filter_map(|m| m.resistance.as_deref()))
    }
}
