//! Resistance code parsing
//!
//! A resistance code is a sequence of 2-character tokens. `HS` marks a
//! healable monster; every other token is an element code followed by an
//! effect code (`F3` = fire boosted, `I2` = ice halved). The whole code
//! `ALL2` is a special marker for "physical and magic damage halved".

use serde::Serialize;
use std::collections::BTreeSet;

/// Special whole-code marker for halved physical and magic damage
pub const ALL_HALVED_CODE: &str = "ALL2";

/// Standalone healable token
pub const HEAL_CODE: &str = "HS";

/// Element of a resistance token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Holy,
    Fire,
    Ice,
    Poison,
    Lightning,
}

impl Element {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'H' => Some(Element::Holy),
            'F' => Some(Element::Fire),
            'I' => Some(Element::Ice),
            'S' => Some(Element::Poison),
            'L' => Some(Element::Lightning),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Element::Holy => 'H',
            Element::Fire => 'F',
            Element::Ice => 'I',
            Element::Poison => 'S',
            Element::Lightning => 'L',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Holy => "Holy",
            Element::Fire => "Fire",
            Element::Ice => "Ice",
            Element::Poison => "Poison",
            Element::Lightning => "Lightning",
        }
    }
}

/// Effect of an element on the monster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Immune,
    Halved,
    Boosted,
}

impl Effect {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(Effect::Immune),
            '2' => Some(Effect::Halved),
            '3' => Some(Effect::Boosted),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Effect::Immune => '1',
            Effect::Halved => '2',
            Effect::Boosted => '3',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Immune => "immune",
            Effect::Halved => "halved",
            Effect::Boosted => "boosted",
        }
    }
}

/// One token of a resistance code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResistanceToken {
    /// Whole-code `ALL2`
    AllHalved,
    /// `HS`
    Heal,
    Element { element: Element, effect: Effect },
    /// Unrecognized 2-character chunk
    Unknown { text: String },
}

impl ResistanceToken {
    /// Buffs are boosted elements and the healable flag
    pub fn is_buff(&self) -> bool {
        match self {
            ResistanceToken::Heal => true,
            ResistanceToken::Element { effect, .. } => *effect == Effect::Boosted,
            _ => false,
        }
    }

    /// Filter tag for this token (`"F3"`, `"HS"`, `"ALL2"`)
    pub fn tag(&self) -> Option<String> {
        match self {
            ResistanceToken::AllHalved => Some(ALL_HALVED_CODE.to_string()),
            ResistanceToken::Heal => Some(HEAL_CODE.to_string()),
            ResistanceToken::Element { element, effect } => {
                Some(format!("{}{}", element.code(), effect.code()))
            }
            ResistanceToken::Unknown { .. } => None,
        }
    }

    /// Human-readable label, `None` for unknown tokens
    pub fn label(&self) -> Option<String> {
        match self {
            ResistanceToken::AllHalved => Some("Physical/magic halved".to_string()),
            ResistanceToken::Heal => Some("Healable".to_string()),
            ResistanceToken::Element { element, effect } => {
                Some(format!("{} {}", element.name(), effect.name()))
            }
            ResistanceToken::Unknown { .. } => None,
        }
    }
}

/// Split a resistance code into tokens.
///
/// Unknown chunks are kept as [`ResistanceToken::Unknown`] so callers can
/// skip them; parsing never fails.
pub fn tokenize(code: &str) -> Vec<ResistanceToken> {
    if code == ALL_HALVED_CODE {
        return vec![ResistanceToken::AllHalved];
    }

    let chars: Vec<char> = code.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len() / 2);
    let mut i = 0;
    while i < chars.len() {
        let first = chars[i];
        let second = chars.get(i + 1).copied();

        let token = if first == 'H' && second == Some('S') {
            ResistanceToken::Heal
        } else {
            match (Element::from_code(first), second.and_then(Effect::from_code)) {
                (Some(element), Some(effect)) => ResistanceToken::Element { element, effect },
                _ => ResistanceToken::Unknown {
                    text: chars[i..chars.len().min(i + 2)].iter().collect(),
                },
            }
        };

        tokens.push(token);
        i += 2;
    }
    tokens
}

/// Resistance tokens grouped for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResistanceSummary {
    pub buffs: Vec<ResistanceToken>,
    pub resistances: Vec<ResistanceToken>,
}

impl ResistanceSummary {
    pub fn from_code(code: &str) -> Self {
        let mut summary = Self::default();
        for token in tokenize(code) {
            match token {
                ResistanceToken::Unknown { .. } => {}
                token if token.is_buff() => summary.buffs.push(token),
                token => summary.resistances.push(token),
            }
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty() && self.resistances.is_empty()
    }
}

/// Resistance filter predicate.
///
/// An empty selection passes everything. Otherwise a monster without a code
/// fails, `ALL2` passes only when `ALL2` is selected, and any other code
/// passes when one of its 2-character chunks is selected.
pub fn passes_filter(code: Option<&str>, selected: &BTreeSet<String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    let Some(code) = code.filter(|c| !c.is_empty()) else {
        return false;
    };
    if code == ALL_HALVED_CODE {
        return selected.contains(ALL_HALVED_CODE);
    }

    let chars: Vec<char> = code.chars().collect();
    chars
        .chunks(2)
        .any(|chunk| selected.contains(&chunk.iter().collect::<String>()))
}

fn tag_rank(tag: &str) -> u8 {
    match tag {
        "F3" => 1,
        "S3" => 2,
        "I3" => 3,
        "L3" => 4,
        "H3" => 5,
        HEAL_CODE => 6,
        _ => 99,
    }
}

/// Filter tags offered to the user, derived from every monster's code.
///
/// Only boosted elements and the healable flag are offered; `ALL2` codes
/// are ignored.
pub fn filter_tags<'a, I>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tags = BTreeSet::new();
    for code in codes {
        if code == ALL_HALVED_CODE {
            continue;
        }
        for token in tokenize(code) {
            if token.is_buff() {
                if let Some(tag) = token.tag() {
                    tags.insert(tag);
                }
            }
        }
    }

    let mut tags: Vec<String> = tags.into_iter().collect();
    tags.sort_by_key(|tag| tag_rank(tag));
    tags
}

/// Display label for a filter tag (`"F3"` → `"Fire boosted"`)
pub fn tag_label(tag: &str) -> String {
    tokenize(tag)
        .first()
        .and_then(ResistanceToken::label)
        .unwrap_or_else(|| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tokenize_elements() {
        assert_eq!(
            tokenize("F3I2"),
            vec![
                ResistanceToken::Element {
                    element: Element::Fire,
                    effect: Effect::Boosted
                },
                ResistanceToken::Element {
                    element: Element::Ice,
                    effect: Effect::Halved
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_heal_before_holy() {
        let tokens = tokenize("HSH1");
        assert_eq!(tokens[0], ResistanceToken::Heal);
        assert_eq!(
            tokens[1],
            ResistanceToken::Element {
                element: Element::Holy,
                effect: Effect::Immune
            }
        );
    }

    #[test]
    fn test_tokenize_unknown_consumes_two_chars() {
        let tokens = tokenize("P1F9L2X");
        assert_eq!(tokens.len(), 4);
        assert!(matches!(tokens[0], ResistanceToken::Unknown { .. }));
        assert!(matches!(tokens[1], ResistanceToken::Unknown { .. }));
        assert_eq!(tokens[2].tag().as_deref(), Some("L2"));
        assert_eq!(
            tokens[3],
            ResistanceToken::Unknown {
                text: "X".to_string()
            }
        );
    }

    #[test]
    fn test_summary_groups_buffs_and_resistances() {
        let summary = ResistanceSummary::from_code("HSF3I1S2Q7");
        let buffs: Vec<_> = summary.buffs.iter().filter_map(|t| t.tag()).collect();
        let resists: Vec<_> = summary.resistances.iter().filter_map(|t| t.tag()).collect();
        assert_eq!(buffs, ["HS", "F3"]);
        assert_eq!(resists, ["I1", "S2"]);

        let all = ResistanceSummary::from_code("ALL2");
        assert_eq!(all.resistances, vec![ResistanceToken::AllHalved]);
        assert!(all.buffs.is_empty());
    }

    #[test]
    fn test_filter_empty_selection_passes() {
        assert!(passes_filter(None, &BTreeSet::new()));
        assert!(passes_filter(Some("F3"), &BTreeSet::new()));
    }

    #[test]
    fn test_filter_missing_code_fails() {
        assert!(!passes_filter(None, &selected(&["F3"])));
        assert!(!passes_filter(Some(""), &selected(&["F3"])));
    }

    #[test]
    fn test_filter_all2_requires_explicit_selection() {
        assert!(passes_filter(Some("ALL2"), &selected(&["ALL2"])));
        assert!(!passes_filter(Some("ALL2"), &selected(&["L2"])));
        assert!(!passes_filter(Some("ALL2"), &selected(&["F3", "HS"])));
    }

    #[test]
    fn test_filter_chunks() {
        assert!(passes_filter(Some("F3I2"), &selected(&["F3"])));
        assert!(passes_filter(Some("F3I2"), &selected(&["I2"])));
        assert!(!passes_filter(Some("F3I2"), &selected(&["I3", "HS"])));
        // Chunks are aligned to even positions
        assert!(!passes_filter(Some("F3I2"), &selected(&["3I"])));
    }

    #[test]
    fn test_filter_tags_ordering() {
        let tags = filter_tags(["HSH3", "L3I1", "F3", "ALL2", "S3S3", "I2"]);
        assert_eq!(tags, ["F3", "S3", "L3", "H3", "HS"]);
    }

    #[test]
    fn test_tag_label() {
        assert_eq!(tag_label("F3"), "Fire boosted");
        assert_eq!(tag_label("HS"), "Healable");
        assert_eq!(tag_label("ALL2"), "Physical/magic halved");
        assert_eq!(tag_label("Q9"), "Q9");
    }
}
