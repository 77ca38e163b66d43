//! Champion reference records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an active ability on the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKey {
    Q,
    W,
    E,
    R,
}

impl AbilityKey {
    /// All keys in slot order
    pub const ALL: [AbilityKey; 4] = [AbilityKey::Q, AbilityKey::W, AbilityKey::E, AbilityKey::R];

    /// Slot index (Q = 0 … R = 3)
    pub fn index(self) -> usize {
        match self {
            AbilityKey::Q => 0,
            AbilityKey::W => 1,
            AbilityKey::E => 2,
            AbilityKey::R => 3,
        }
    }

    /// Parse a single-letter key, case-insensitive.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.to_ascii_lowercase().as_str() {
            "q" => Some(AbilityKey::Q),
            "w" => Some(AbilityKey::W),
            "e" => Some(AbilityKey::E),
            "r" => Some(AbilityKey::R),
            _ => None,
        }
    }
}

impl fmt::Display for AbilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            AbilityKey::Q => "Q",
            AbilityKey::W => "W",
            AbilityKey::E => "E",
            AbilityKey::R => "R",
        };
        f.write_str(letter)
    }
}

/// Passive or one of the four active abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilitySlot {
    Passive,
    Active(AbilityKey),
}

impl fmt::Display for AbilitySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilitySlot::Passive => f.write_str("Passif"),
            AbilitySlot::Active(key) => write!(f, "{}", key),
        }
    }
}

/// Base statistics with their per-level growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: f64,
    pub hp_per_level: f64,
    pub mp: f64,
    pub mp_per_level: f64,
    pub mp_regen: f64,
    pub armor: f64,
    pub armor_per_level: f64,
    pub magic_resist: f64,
    pub magic_resist_per_level: f64,
    pub attack_damage: f64,
    pub attack_damage_per_level: f64,
    pub attack_speed: f64,
    /// Percent bonus attack speed gained per level
    pub attack_speed_per_level: f64,
    pub move_speed: f64,
    pub attack_range: f64,
}

/// Designer ratings shown in the client (0-10).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionRatings {
    pub attack: u8,
    pub defense: u8,
    pub magic: u8,
    pub difficulty: u8,
}

/// An active ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
    /// Cooldown per rank, in seconds
    pub cooldowns: Vec<f64>,
    /// Cost per rank
    pub costs: Vec<f64>,
    /// Resource consumed by the cost (mana, énergie, …)
    pub cost_type: String,
    /// Range per rank, in game units
    pub ranges: Vec<f64>,
}

/// The innate passive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passive {
    pub name: String,
    pub description: String,
}

/// Immutable reference data for one champion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Canonical identifier used by the data service (e.g. `MonkeyKing`)
    pub id: String,
    /// Display name (e.g. `Wukong`)
    pub name: String,
    pub title: String,
    pub lore: String,
    pub blurb: String,
    /// Class tags in upstream order (`Mage`, `Assassin`, …)
    pub tags: Vec<String>,
    /// Resource bar (`Mana`, `Énergie`, `Aucun`, …)
    pub resource: String,
    pub info: ChampionRatings,
    pub stats: BaseStats,
    pub abilities: [Ability; 4],
    pub passive: Passive,
    pub ally_tips: Vec<String>,
    pub enemy_tips: Vec<String>,
}

impl ReferenceRecord {
    /// Active ability at a key.
    pub fn ability(&self, key: AbilityKey) -> &Ability {
        &self.abilities[key.index()]
    }

    /// Whether the champion carries a class tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Name and description of a slot.
    pub fn slot_text(&self, slot: AbilitySlot) -> (&str, &str) {
        match slot {
            AbilitySlot::Passive => (&self.passive.name, &self.passive.description),
            AbilitySlot::Active(key) => {
                let ability = self.ability(key);
                (&ability.name, &ability.description)
            }
        }
    }

    /// Whether the champion spends mana.
    pub fn uses_mana(&self) -> bool {
        self.stats.mp > 0.0
    }
}

/// Remove the inline markup Data Dragon puts in descriptions.
pub fn strip_markup(text: &str) -> String {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid markup regex"));
    static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid spacing regex"));

    let without_tags = TAG.replace_all(text, " ");
    SPACES.replace_all(without_tags.trim(), " ").into_owned()
}
