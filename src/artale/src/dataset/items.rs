//! Drop item parsing and categorization

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

/// Id range treated as equipment when ordering a monster's drop list.
pub const EQUIP_SORT_RANGE: RangeInclusive<u32> = 1_000_001..=1_999_999;

/// Id ranges displayed in the equipment group (weapons, armor, throwing stars, bullets).
const EQUIP_RANGES: [RangeInclusive<u32>; 3] = [
    1_000_001..=1_999_999,
    2_060_000..=2_079_999,
    2_330_000..=2_339_999,
];
const USE_RANGE: RangeInclusive<u32> = 2_000_000..=2_999_999;
const ETC_RANGE: RangeInclusive<u32> = 4_000_000..=4_999_999;

/// External item library used for item links
pub const ITEM_LIBRARY_URL: &str = "https://maplesaga.com/library/cn/permalink";

/// Display category of a drop item, derived from its id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Equip,
    Use,
    Etc,
    Other,
}

impl ItemCategory {
    /// Display order of the category groups on a card
    pub const DISPLAY_ORDER: [ItemCategory; 4] = [
        ItemCategory::Equip,
        ItemCategory::Use,
        ItemCategory::Etc,
        ItemCategory::Other,
    ];

    pub fn from_id(id: u32) -> Self {
        if EQUIP_RANGES.iter().any(|range| range.contains(&id)) {
            ItemCategory::Equip
        } else if USE_RANGE.contains(&id) {
            ItemCategory::Use
        } else if ETC_RANGE.contains(&id) {
            ItemCategory::Etc
        } else {
            ItemCategory::Other
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemCategory::Equip => write!(f, "Equip"),
            ItemCategory::Use => write!(f, "Use"),
            ItemCategory::Etc => write!(f, "Etc"),
            ItemCategory::Other => write!(f, "Other"),
        }
    }
}

/// One entry of a monster's drop list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropItem {
    /// Drop string exactly as it appears in the drop table
    pub raw: String,
    /// Item name with any quantity suffix removed
    pub name: String,
    /// Quantity text from a trailing "X n" suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Item id from the name table, 0 when unknown
    pub id: u32,
    pub category: ItemCategory,
}

impl DropItem {
    /// Parse a raw drop string, resolving its id through `name_to_id`
    pub fn parse(raw: &str, name_to_id: &HashMap<String, u32>) -> Self {
        let (name, quantity) = split_quantity(raw);
        let id = name_to_id.get(name).copied().unwrap_or(0);
        Self {
            raw: raw.to_string(),
            name: name.to_string(),
            quantity: quantity.map(str::to_string),
            id,
            category: ItemCategory::from_id(id),
        }
    }

    pub fn is_equipment(&self) -> bool {
        self.category == ItemCategory::Equip
    }

    /// Link to the item's page in the external item library
    pub fn library_url(&self) -> String {
        let kind = if self.is_equipment() { "equip" } else { "item" };
        format!("{}/{}/{}", ITEM_LIBRARY_URL, kind, self.id)
    }
}

fn quantity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<name>.*?\S)\s+[Xx]\s*(?P<qty>\d+(?:\s*[~\-]\s*\d+)?)\s*$")
            .expect("quantity pattern is valid")
    })
}

/// Split a raw drop string into item name and optional quantity.
///
/// `"Red Potion X 3"` becomes `("Red Potion", Some("3"))`; strings without a
/// trailing quantity are returned trimmed.
pub fn split_quantity(raw: &str) -> (&str, Option<&str>) {
    match quantity_pattern().captures(raw) {
        Some(caps) => match (caps.name("name"), caps.name("qty")) {
            (Some(name), Some(qty)) => (name.as_str().trim(), Some(qty.as_str())),
            _ => (raw.trim(), None),
        },
        None => (raw.trim(), None),
    }
}

/// Drop list ordering: equipment-range ids first, then ascending id
pub fn compare_drop_order(a: &DropItem, b: &DropItem) -> Ordering {
    let a_equip = EQUIP_SORT_RANGE.contains(&a.id);
    let b_equip = EQUIP_SORT_RANGE.contains(&b.id);
    b_equip.cmp(&a_equip).then(a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> HashMap<String, u32> {
        let mut ids = HashMap::new();
        ids.insert("Sword".to_string(), 1_000_050);
        ids.insert("Red Potion".to_string(), 2_000_010);
        ids.insert("Subi Throwing-Stars".to_string(), 2_070_000);
        ids.insert("Snail Shell".to_string(), 4_000_019);
        ids
    }

    #[test]
    fn test_split_quantity() {
        assert_eq!(split_quantity("Red Potion X 3"), ("Red Potion", Some("3")));
        assert_eq!(split_quantity("Red Potion x3"), ("Red Potion", Some("3")));
        assert_eq!(split_quantity("Mesos X 10~20"), ("Mesos", Some("10~20")));
        assert_eq!(split_quantity("Sword"), ("Sword", None));
        // An 'x' inside a name is not a quantity marker
        assert_eq!(split_quantity("Axe"), ("Axe", None));
        assert_eq!(split_quantity("Box X"), ("Box X", None));
    }

    #[test]
    fn test_parse_resolves_id_and_category() {
        let ids = ids();
        let potion = DropItem::parse("Red Potion X 3", &ids);
        assert_eq!(potion.name, "Red Potion");
        assert_eq!(potion.quantity.as_deref(), Some("3"));
        assert_eq!(potion.id, 2_000_010);
        assert_eq!(potion.category, ItemCategory::Use);

        let sword = DropItem::parse("Sword", &ids);
        assert!(sword.is_equipment());

        let unknown = DropItem::parse("Mystery Box", &ids);
        assert_eq!(unknown.id, 0);
        assert_eq!(unknown.category, ItemCategory::Other);
    }

    #[test]
    fn test_category_ranges() {
        assert_eq!(ItemCategory::from_id(1_000_001), ItemCategory::Equip);
        assert_eq!(ItemCategory::from_id(2_070_000), ItemCategory::Equip);
        assert_eq!(ItemCategory::from_id(2_330_005), ItemCategory::Equip);
        assert_eq!(ItemCategory::from_id(2_000_000), ItemCategory::Use);
        assert_eq!(ItemCategory::from_id(4_000_019), ItemCategory::Etc);
        assert_eq!(ItemCategory::from_id(3_010_000), ItemCategory::Other);
        assert_eq!(ItemCategory::from_id(0), ItemCategory::Other);
    }

    #[test]
    fn test_library_url() {
        let ids = ids();
        assert_eq!(
            DropItem::parse("Sword", &ids).library_url(),
            "https://maplesaga.com/library/cn/permalink/equip/1000050"
        );
        assert_eq!(
            DropItem::parse("Snail Shell", &ids).library_url(),
            "https://maplesaga.com/library/cn/permalink/item/4000019"
        );
    }

    #[test]
    fn test_drop_order_equipment_first() {
        let ids = ids();
        let mut items: Vec<DropItem> = ["Snail Shell", "Mystery Box", "Red Potion X 3", "Sword"]
            .iter()
            .map(|raw| DropItem::parse(raw, &ids))
            .collect();
        items.sort_by(compare_drop_order);

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Sword", "Mystery Box", "Red Potion", "Snail Shell"]);
    }

    #[test]
    fn test_drop_order_throwing_stars_not_sorted_as_equipment() {
        let ids = ids();
        let mut items = vec![
            DropItem::parse("Subi Throwing-Stars", &ids),
            DropItem::parse("Red Potion", &ids),
        ];
        items.sort_by(compare_drop_order);
        // Displayed as equipment, but ordered by id like any other item
        assert_eq!(items[0].name, "Red Potion");
        assert!(items[1].is_equipment());
    }
}
