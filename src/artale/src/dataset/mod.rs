//! Drop database datasets
//!
//! Loads the raw JSON datasets and normalizes them into a [`NormalizedIndex`]:
//! drop lists sorted and resolved to item ids, spawn maps corrected, boss and
//! alias tables ready for lookup.

mod index;
mod items;
mod maps;
mod raw;

pub use index::{Monster, NormalizedIndex, RegionOption};
pub use items::{
    compare_drop_order, split_quantity, DropItem, ItemCategory, EQUIP_SORT_RANGE,
    ITEM_LIBRARY_URL,
};
pub use maps::{
    correct_map_name, correct_spawn_maps, region_of, SpawnMaps, INVALID_SENTINEL,
    REGION_DELIMITER,
};
pub use raw::{DatasetFile, DatasetSources, MobAttributes, RawDatasets};

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small snapshot covering bosses, aliases, corrections and resistances
    pub fn sources() -> DatasetSources<'static> {
        DatasetSources {
            drops: r#"{
                "Slime": ["Red Potion X 3", "Sword", "Snail Shell"],
                "Balrog": ["Blue Potion", "Sword"],
                "Snail": ["Snail Shell X 2", "Red Potion"],
                "Ghost": ["Ectoplasm"],
                "Drifter": ["Sword"]
            }"#,
            mobs: r#"{
                "Slime": [10, 100, 0, 15, 10, 5, 2, 20, "slime.png", "F3I2"],
                "Balrog": [65, "500000(x3)", 1000, 9000, 800, 700, 30, 190, "balrog.png", "HSH3"],
                "Snail": [1, 8, 0, 3, 0, 0, 0, 1, "snail.png"],
                "Ghost": [30, 2000, 100, 120, 60, 90, 20, 70, "ghost.png", "ALL2"]
            }"#,
            items: r#"{
                "1000050": "Sword",
                "2000010": "Red Potion",
                "2000020": "Blue Potion",
                "4000019": "Snail Shell"
            }"#,
            boss_timers: r#"{"Balrog": "24小時"}"#,
            spawn_maps: r#"{
                "Slime": {"維多利亞：弓箭手村": 1, "Hidden：Cave": 1},
                "Balrog": {"Sleepy：Dungeon": 1},
                "Snail": {"維多利亞：Field": 1},
                "Ghost": {"Hidden：Tomb": 1}
            }"#,
            map_corrections: r#"{"Hidden": "INVALID", "Sleepy": "沉睡森林"}"#,
            area_defaults: r#"{"維多利亞": 1, "沉睡森林": 0, "Ludibrium": 1}"#,
            aliases: r#"{"Slime": "Goo", "Sword": "Sword"}"#,
        }
    }

    pub fn index() -> NormalizedIndex {
        NormalizedIndex::from_sources(&sources()).unwrap()
    }
}
