//! Result card rendering
//!
//! A [`Card`] is the display model of one [`ResultEntry`]: highlighted names,
//! monster stats, resistance badges, spawn maps and drops grouped by
//! category. It serializes to JSON for browser front ends and renders to
//! plain text for the terminal.

use serde::Serialize;
use std::fmt::Write as _;

use crate::dataset::{DropItem, ItemCategory, MobAttributes, NormalizedIndex};
use crate::matching::{highlight, Keyword, MatchEngine, Marker};
use crate::pipeline::ResultEntry;
use crate::resistance::{ResistanceSummary, ResistanceToken};

/// Relative path of the image for a monster or item
pub fn image_path(name: &str) -> String {
    format!("image/{}.png", urlencoding::encode(name))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardStats {
    pub level: i64,
    pub hp: String,
    pub mp: String,
    pub exp: String,
    pub evasion: String,
    pub physical_def: String,
    pub magic_def: String,
    pub accuracy_req: String,
}

impl From<&MobAttributes> for CardStats {
    fn from(mob: &MobAttributes) -> Self {
        Self {
            level: mob.level,
            hp: mob.hp.clone(),
            mp: mob.mp.clone(),
            exp: mob.exp.clone(),
            evasion: mob.evasion.clone(),
            physical_def: mob.physical_def.clone(),
            magic_def: mob.magic_def.clone(),
            accuracy_req: mob.accuracy_req.clone(),
        }
    }
}

/// One resistance tag shown on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResistanceBadge {
    pub label: String,
    /// Style class, e.g. `resistance-fire`
    pub class: String,
}

impl ResistanceBadge {
    fn from_token(token: &ResistanceToken) -> Option<Self> {
        let class = match token {
            ResistanceToken::AllHalved => "all2".to_string(),
            ResistanceToken::Heal => "heal".to_string(),
            ResistanceToken::Element { element, .. } => element.name().to_lowercase(),
            ResistanceToken::Unknown { .. } => return None,
        };
        Some(Self {
            label: token.label()?,
            class: format!("resistance-{}", class),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardItem {
    pub name: String,
    /// Display name with alias, boss marker and quantity, highlighted
    pub label: String,
    pub icon: String,
    pub link: String,
    /// Whether the item itself matches the keyword
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemGroup {
    pub category: ItemCategory,
    pub items: Vec<CardItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub monster: String,
    /// Highlighted display name
    pub title: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CardStats>,
    pub buffs: Vec<ResistanceBadge>,
    pub resistances: Vec<ResistanceBadge>,
    pub spawn_maps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respawn_time: Option<String>,
    /// Non-empty groups in equip, use, etc, other order
    pub item_groups: Vec<ItemGroup>,
}

impl Card {
    pub fn build(
        index: &NormalizedIndex,
        entry: &ResultEntry,
        keyword: &str,
        marker: Marker,
    ) -> Self {
        let engine = MatchEngine::new(index);
        let prepared = Keyword::new(keyword);
        let monster = entry.monster.as_str();
        let view = index.monster(monster);
        let attributes = view.and_then(|m| m.attributes);

        let summary = view
            .and_then(|m| m.resistance_code())
            .map(ResistanceSummary::from_code)
            .unwrap_or_default();
        let badges = |tokens: &[ResistanceToken]| -> Vec<ResistanceBadge> {
            tokens.iter().filter_map(ResistanceBadge::from_token).collect()
        };

        let spawn_maps = view
            .and_then(|m| m.spawn_maps)
            .map(|maps| maps.keys().cloned().collect())
            .unwrap_or_default();

        let card_item = |item: &DropItem| CardItem {
            name: item.name.clone(),
            label: highlight(
                &engine.display_name(&item.name, item.quantity.as_deref()),
                keyword,
                marker,
            ),
            icon: image_path(&item.name),
            link: item.library_url(),
            highlighted: !prepared.is_empty() && engine.matches_keyword(&item.name, &prepared),
        };

        let item_groups = ItemCategory::DISPLAY_ORDER
            .iter()
            .map(|category| ItemGroup {
                category: *category,
                items: entry
                    .items
                    .iter()
                    .filter(|item| item.category == *category)
                    .map(&card_item)
                    .collect(),
            })
            .filter(|group| !group.items.is_empty())
            .collect();

        Self {
            monster: monster.to_string(),
            title: highlight(&engine.display_name(monster, None), keyword, marker),
            image: image_path(monster),
            stats: attributes.map(CardStats::from),
            buffs: badges(&summary.buffs),
            resistances: badges(&summary.resistances),
            spawn_maps,
            respawn_time: view.and_then(|m| m.respawn_time).map(str::to_string),
            item_groups,
        }
    }

    /// Collapsed spawn map heading, e.g. `Spawn maps (3)`
    pub fn spawn_summary(&self) -> String {
        format!("Spawn maps ({})", self.spawn_maps.len())
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "== {} ==", self.title);
        if let Some(stats) = &self.stats {
            let _ = writeln!(out, "  Lv {}", stats.level);
            let _ = writeln!(
                out,
                "   HP {} | MP {} | EXP {} | EVA {}",
                stats.hp, stats.mp, stats.exp, stats.evasion
            );
            let _ = writeln!(
                out,
                "   PDEF {} | MDEF {} | ACC {}",
                stats.physical_def, stats.magic_def, stats.accuracy_req
            );
        } else {
            out.push('\n');
        }

        let join = |badges: &[ResistanceBadge]| {
            badges
                .iter()
                .map(|b| b.label.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        if !self.buffs.is_empty() {
            let _ = writeln!(out, "   Buffs: {}", join(&self.buffs));
        }
        if !self.resistances.is_empty() {
            let _ = writeln!(out, "   Resistances: {}", join(&self.resistances));
        }
        if !self.spawn_maps.is_empty() {
            let _ = writeln!(
                out,
                "   {}: {}",
                self.spawn_summary(),
                self.spawn_maps.join(", ")
            );
        }
        if let Some(respawn) = &self.respawn_time {
            let _ = writeln!(out, "   Respawn: {}", respawn);
        }

        for group in &self.item_groups {
            let labels: Vec<&str> = group.items.iter().map(|i| i.label.as_str()).collect();
            let _ = writeln!(out, "   [{}] {}", group.category, labels.join(", "));
        }
        out
    }
}
